use std::collections::BTreeMap;

use ::testbuilder::{ConstructError, Fault, FieldAccess, FieldError, raise};

use crate::{
  animals::Tag,
  shapes::Point,
  testbuilder::{
    accounts::{TAccount, TInvoice, TLedger, TVault, t_ledger, t_vault},
    animals::dog::TDog,
    shapes::{TCircle, TPoint, TRect},
    tokens::TToken,
  },
};

#[test]
fn test_sets_private_fields() {
  let point = TPoint::builder().x(3).y(4).build();
  assert_eq!(point.x(), 3);
  assert_eq!(point.y(), 4);
}

#[test]
fn test_unset_fields_keep_constructor_values() {
  let point = TPoint::builder().y(9).build();
  assert_eq!(point.x(), Point::default().x());
  assert_eq!(point.y(), 9);
}

#[test]
fn test_field_of_crate_type() {
  let circle = TCircle::builder()
    .center(TPoint::builder().x(1).y(2).build())
    .radius(2.5)
    .build();
  assert_eq!(circle.center().x(), 1);
  assert_eq!(circle.center().y(), 2);
  assert!((circle.radius() - 2.5).abs() < f64::EPSILON);
}

#[test]
fn test_cfg_attr_marker() {
  let rect = TRect::builder().width(3).height(5).build();
  assert_eq!(rect.area(), 15);
}

#[test]
fn test_sets_fields_across_parent_chain() {
  let dog = TDog::builder()
    .breed("collie".to_string())
    .toys(BTreeMap::from([("ball".to_string(), 2)]))
    .owner(Some("sam".to_string()))
    .name("rex".to_string())
    .legs(4)
    .tags(vec![Tag("good")])
    .build();

  assert_eq!(dog.breed(), "collie");
  assert_eq!(dog.toys().get("ball"), Some(&2));
  assert_eq!(dog.pet().owner(), Some("sam"));
  assert_eq!(dog.pet().animal().name(), "rex");
  assert_eq!(dog.pet().animal().legs(), 4);
  assert_eq!(dog.pet().animal().tags(), [Tag("good")]);
}

#[test]
fn test_nearest_declaration_wins() {
  let invoice = TInvoice::builder()
    .id("INV-7".to_string())
    .amount_cents(1250)
    .created_by("billing".to_string())
    .build();

  assert_eq!(invoice.id(), "INV-7");
  assert_eq!(invoice.amount_cents(), 1250);
  assert_eq!(invoice.record().id(), 0);
  assert_eq!(invoice.record().created_by(), "billing");
}

#[test]
fn test_named_private_constructor() {
  let account = TAccount::builder().id(42).build();
  assert_eq!(account.id(), 42);
  assert_eq!(account.balance_cents(), 0);
  assert!(account.is_frozen());

  let thawed = TAccount::builder().frozen(false).balance_cents(-5).build();
  assert!(!thawed.is_frozen());
  assert_eq!(thawed.balance_cents(), -5);
}

#[test]
fn test_keyword_fields() {
  let token = TToken::builder()
    .r#type("ident".to_string())
    .value("x".to_string())
    .r#static(true)
    .build();
  assert_eq!(token.kind(), "ident");
  assert_eq!(token.value(), "x");
  assert!(token.is_static());
}

#[test]
#[should_panic(expected = "no zero-argument constructor")]
fn test_missing_constructor_panics() {
  let _ = TLedger::builder();
}

#[test]
fn test_missing_constructor_try_new() {
  let Err(fault) = t_ledger::Builder::try_new() else {
    panic!("Ledger has no zero-argument constructor");
  };
  let message = fault.chain();
  assert!(message.starts_with("could not instantiate `"));
  assert!(message.contains("Ledger"));
  assert!(matches!(
    fault,
    Fault::Instantiate {
      source: ConstructError::NoZeroArgConstructor { .. },
      ..
    }
  ));
}

#[test]
fn test_panicking_constructor() {
  let Err(fault) = t_vault::Builder::try_new() else {
    panic!("Vault's constructor always panics");
  };
  match fault {
    Fault::Instantiate {
      source: ConstructError::Panicked { message, .. },
      ..
    } => assert_eq!(message, "vault is sealed"),
    other => panic!("unexpected fault: {other}"),
  }
}

#[test]
#[should_panic(expected = "vault is sealed")]
fn test_panicking_constructor_through_builder() {
  let _ = TVault::builder();
}

#[test]
fn test_field_access_reports_unknown_field() {
  let mut point = Point::default();
  let err = point.set_field("z", Box::new(1_i32)).unwrap_err();
  assert!(matches!(err, FieldError::NotFound { ref field } if field == "z"));
}

#[test]
fn test_field_access_walks_parents_before_failing() {
  let mut dog = TDog::builder().build();
  dog.set_field("legs", Box::new(3_u8)).unwrap();
  assert_eq!(dog.pet().animal().legs(), 3);

  let err = dog.set_field("wings", Box::new(2_u8)).unwrap_err();
  assert_eq!(err.to_string(), "field not found: `wings`");
}

#[test]
fn test_field_access_rejects_wrong_type() {
  let mut point = Point::default();
  let err = point.set_field("x", Box::new("three")).unwrap_err();
  assert!(matches!(err, FieldError::TypeMismatch { expected: "i32", .. }));
  assert_eq!(point.x(), 0);
}

#[test]
#[should_panic(expected = "could not assign field `z` of `")]
fn test_raise_reports_assign_fault() {
  let mut point = Point::default();
  if let Err(source) = point.set_field("z", Box::new(1_i32)) {
    raise(Fault::assign::<Point>("z", source));
  }
}
