use testbuilder::TestBuilder;

#[derive(Debug, Clone, Copy, Default, PartialEq, TestBuilder)]
pub struct Point {
  x: i32,
  y: i32,
}

impl Point {
  pub fn x(&self) -> i32 {
    self.x
  }

  pub fn y(&self) -> i32 {
    self.y
  }
}

#[derive(Debug, Default, PartialEq, TestBuilder)]
pub struct Circle {
  center: Point,
  radius: f64,
}

impl Circle {
  pub fn center(&self) -> Point {
    self.center
  }

  pub fn radius(&self) -> f64 {
    self.radius
  }
}

/// Only marked in test builds.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(TestBuilder))]
pub struct Rect {
  width: u32,
  height: u32,
}

impl Rect {
  pub fn area(&self) -> u32 {
    self.width * self.height
  }
}
