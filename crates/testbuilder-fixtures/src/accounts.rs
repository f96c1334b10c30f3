use testbuilder::{FieldAccess, TestBuilder};

#[derive(Debug, Default, FieldAccess)]
pub struct Record {
  id: u64,
  created_by: String,
}

impl Record {
  pub fn id(&self) -> u64 {
    self.id
  }

  pub fn created_by(&self) -> &str {
    &self.created_by
  }
}

/// `id` here hides `Record::id`.
#[derive(Debug, Default, TestBuilder)]
pub struct Invoice {
  id: String,
  amount_cents: i64,
  #[test_builder(parent)]
  record: Record,
}

impl Invoice {
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn amount_cents(&self) -> i64 {
    self.amount_cents
  }

  pub fn record(&self) -> &Record {
    &self.record
  }
}

#[derive(Debug, TestBuilder)]
#[test_builder(constructor = Self::locked)]
pub struct Account {
  id: u64,
  balance_cents: i64,
  frozen: bool,
}

impl Account {
  pub fn open(id: u64) -> Self {
    Self {
      id,
      balance_cents: 0,
      frozen: false,
    }
  }

  /// Accounts start frozen until they pass review.
  fn locked() -> Self {
    Self {
      id: 0,
      balance_cents: 0,
      frozen: true,
    }
  }

  pub fn id(&self) -> u64 {
    self.id
  }

  pub fn balance_cents(&self) -> i64 {
    self.balance_cents
  }

  pub fn is_frozen(&self) -> bool {
    self.frozen
  }
}

/// No `Default` and no constructor attribute.
#[derive(Debug, TestBuilder)]
pub struct Ledger {
  entries: Vec<i64>,
}

impl Ledger {
  pub fn new(entries: Vec<i64>) -> Self {
    Self { entries }
  }

  pub fn total(&self) -> i64 {
    self.entries.iter().sum()
  }
}

#[derive(Debug, TestBuilder)]
#[test_builder(constructor = Self::sealed)]
pub struct Vault {
  secret: String,
}

impl Vault {
  pub fn open(secret: impl Into<String>) -> Self {
    Self { secret: secret.into() }
  }

  fn sealed() -> Self {
    panic!("vault is sealed")
  }

  pub fn secret(&self) -> &str {
    &self.secret
  }
}
