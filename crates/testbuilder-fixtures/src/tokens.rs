use testbuilder::TestBuilder;

#[derive(Debug, Default, PartialEq, Eq, TestBuilder)]
pub struct Token {
  r#type: String,
  value: String,
  r#static: bool,
}

impl Token {
  pub fn kind(&self) -> &str {
    &self.r#type
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn is_static(&self) -> bool {
    self.r#static
  }
}
