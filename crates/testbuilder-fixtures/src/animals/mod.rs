use testbuilder::FieldAccess;

mod dog;

pub use dog::Dog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub &'static str);

#[derive(Debug, Default, FieldAccess)]
pub struct Animal {
  name: String,
  legs: u8,
  tags: Vec<Tag>,
}

impl Animal {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn legs(&self) -> u8 {
    self.legs
  }

  pub fn tags(&self) -> &[Tag] {
    &self.tags
  }
}

#[derive(Debug, Default, FieldAccess)]
pub struct Pet {
  owner: Option<String>,
  #[test_builder(parent)]
  animal: Animal,
}

impl Pet {
  pub fn owner(&self) -> Option<&str> {
    self.owner.as_deref()
  }

  pub fn animal(&self) -> &Animal {
    &self.animal
  }
}
