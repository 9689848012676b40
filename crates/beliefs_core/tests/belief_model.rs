use beliefs_core::{
    Belief, BeliefDraft, BeliefId, BeliefInput, BeliefType, BeliefValidationError,
};
use chrono::{NaiveDate, TimeZone, Utc};

#[test]
fn create_stamps_date_and_generates_id() {
    let now = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 58).unwrap();
    let belief = Belief::create(BeliefDraft::new("Ship early", BeliefType::Principle), now);

    assert!(!belief.id.as_uuid().is_nil());
    assert_eq!(belief.date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    assert_eq!(belief.created_at, now);
    assert_eq!(belief.message, "Ship early");
}

#[test]
fn generated_ids_are_unique() {
    let first = BeliefId::generate();
    let second = BeliefId::generate();
    assert_ne!(first, second);
}

#[test]
fn public_shape_exposes_only_id_date_message_type() {
    let now = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();
    let belief = Belief::create(BeliefDraft::new("Read the source", BeliefType::Discovery), now);

    let json = serde_json::to_value(belief.to_public()).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["date", "id", "message", "type"]);
    assert_eq!(json["id"], belief.id.to_string());
    assert_eq!(json["date"], "2024-06-02");
    assert_eq!(json["message"], "Read the source");
    assert_eq!(json["type"], "discovery");
}

#[test]
fn input_decodes_wire_field_names() {
    let input: BeliefInput =
        serde_json::from_str(r#"{"message":"Stay curious","type":"principle"}"#).unwrap();
    let draft = input.validate().unwrap();

    assert_eq!(draft, BeliefDraft::new("Stay curious", BeliefType::Principle));
}

#[test]
fn input_missing_fields_fail_validation_not_decoding() {
    let input: BeliefInput = serde_json::from_str("{}").unwrap();
    assert_eq!(input.validate(), Err(BeliefValidationError::MissingMessage));

    let input: BeliefInput = serde_json::from_str(r#"{"message":"x"}"#).unwrap();
    assert_eq!(input.validate(), Err(BeliefValidationError::MissingType));

    let input: BeliefInput =
        serde_json::from_str(r#"{"message":"","type":"principle"}"#).unwrap();
    assert_eq!(input.validate(), Err(BeliefValidationError::MissingMessage));
}

#[test]
fn input_rejects_unknown_type() {
    let input = BeliefInput {
        message: Some("Hot take".to_string()),
        kind: Some("opinion".to_string()),
    };
    assert_eq!(
        input.validate(),
        Err(BeliefValidationError::UnknownType("opinion".to_string()))
    );
}

#[test]
fn input_preserves_message_verbatim() {
    let input = BeliefInput {
        message: Some("  padded\nmultiline  ".to_string()),
        kind: Some("discovery".to_string()),
    };
    assert_eq!(input.validate().unwrap().message, "  padded\nmultiline  ");
}

#[test]
fn belief_id_accepts_uppercase_canonical_form() {
    let id: BeliefId = "6F9619FF-8B86-4011-B42D-00C04FC964FF".parse().unwrap();
    assert_eq!(id.to_string(), "6f9619ff-8b86-4011-b42d-00c04fc964ff");
}
