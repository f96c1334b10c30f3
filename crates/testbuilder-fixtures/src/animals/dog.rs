use std::collections::BTreeMap;

use testbuilder::TestBuilder;

use super::Pet;

#[derive(Debug, Default, TestBuilder)]
pub struct Dog {
  breed: String,
  toys: BTreeMap<String, u32>,
  #[test_builder(parent)]
  pet: Pet,
}

impl Dog {
  pub fn breed(&self) -> &str {
    &self.breed
  }

  pub fn toys(&self) -> &BTreeMap<String, u32> {
    &self.toys
  }

  pub fn pet(&self) -> &Pet {
    &self.pet
  }
}
