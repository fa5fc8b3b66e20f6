use sql_record::prelude::*;

struct User {
    id: i64,
    name: String,
    // session-local scratch state, deliberately not registered
    #[allow(dead_code)]
    dirty: bool,
}

impl Record for User {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::scalar("id", "", &mut self.id),
            Field::scalar("name", "", &mut self.name),
        ]
    }
}

fn user() -> User {
    User {
        id: 0,
        name: String::new(),
        dirty: false,
    }
}

#[derive(Default)]
struct Address {
    street: String,
    city: String,
}

impl Record for Address {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::scalar("street", "", &mut self.street),
            Field::scalar("city", "", &mut self.city),
        ]
    }
}

#[test]
fn id_field_becomes_primary_key_by_convention() {
    let mut user = user();
    let table = Table::extract(&mut user).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].name(), "id");
    assert_eq!(pks[0].field_path(), "id");
}

#[test]
fn unregistered_fields_produce_no_columns() {
    let mut user = user();
    let table = Table::extract(&mut user).unwrap();

    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.columns()[1].field_path(), "name");
}

#[test]
fn pk_tag_overrides_convention() {
    struct Session {
        user_id: i64,
    }
    impl Record for Session {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::scalar("user_id", ",pk", &mut self.user_id)]
        }
    }

    let mut session = Session { user_id: 0 };
    let table = Table::extract(&mut session).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].name(), "user_id");
}

#[test]
fn multiple_pk_tags_form_a_composite_key_in_order() {
    struct Membership {
        id: i64,
        user_id: i64,
    }
    impl Record for Membership {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", ",pk", &mut self.id),
                Field::scalar("user_id", ",pk", &mut self.user_id),
            ]
        }
    }

    let mut m = Membership { id: 0, user_id: 0 };
    let table = Table::extract(&mut m).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 2);
    assert_eq!(pks[0].name(), "id");
    assert_eq!(pks[1].name(), "user_id");
}

#[test]
fn pk_tag_beats_id_convention_regardless_of_order() {
    struct Login {
        id: i64,
        user_id: i64,
    }
    impl Record for Login {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::scalar("user_id", ",pk", &mut self.user_id),
            ]
        }
    }

    let mut login = Login { id: 0, user_id: 0 };
    let table = Table::extract(&mut login).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].name(), "user_id");
}

#[test]
fn missing_primary_key_fails_extraction() {
    struct Note {
        body: String,
    }
    impl Record for Note {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::scalar("body", "", &mut self.body)]
        }
    }

    let mut note = Note { body: String::new() };
    let err = Table::extract(&mut note).unwrap_err();
    assert!(matches!(err, SqlRecordError::NoPrimaryKey));
}

#[test]
fn embedded_record_columns_are_flattened_with_prefix() {
    struct Profile {
        id: i64,
        name: String,
        address: Address,
    }
    impl Record for Profile {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::scalar("name", "", &mut self.name),
                Field::embedded("address", "", &mut self.address),
            ]
        }
    }

    let mut profile = Profile {
        id: 0,
        name: String::new(),
        address: Address::default(),
    };
    let table = Table::extract(&mut profile).unwrap();

    assert_eq!(table.columns().len(), 4);
    assert_eq!(table.columns()[2].name(), "address_street");
    assert_eq!(table.columns()[2].field_path(), "address.street");
    assert_eq!(table.columns()[3].name(), "address_city");
    assert_eq!(table.columns()[3].field_path(), "address.city");
}

#[test]
fn embedded_record_supplies_fallback_primary_key() {
    struct Admin {
        user: User,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::embedded("user", "", &mut self.user)]
        }
    }

    let mut admin = Admin { user: user() };
    let table = Table::extract(&mut admin).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].name(), "user_id");
    // resolved keys are first-class columns of the root table
    assert!(!pks[0].is_from_embedded());
}

#[test]
fn embedded_pk_tag_supplies_fallback_primary_key() {
    struct Session {
        user_id: i64,
    }
    impl Record for Session {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::scalar("user_id", ",pk", &mut self.user_id)]
        }
    }
    struct Audit {
        session: Session,
    }
    impl Record for Audit {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::embedded("session", "", &mut self.session)]
        }
    }

    let mut audit = Audit {
        session: Session { user_id: 0 },
    };
    let table = Table::extract(&mut audit).unwrap();
    assert_eq!(table.primary_keys()[0].name(), "session_user_id");
}

#[test]
fn root_id_beats_embedded_candidate_declared_before_it() {
    struct Admin {
        user: User,
        id: i64,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::embedded("user", "", &mut self.user),
                Field::scalar("id", "", &mut self.id),
            ]
        }
    }

    let mut admin = Admin {
        user: user(),
        id: 0,
    };
    let table = Table::extract(&mut admin).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].name(), "id");
    assert_eq!(pks[0].field_path(), "id");
}

#[test]
fn root_id_beats_embedded_candidate_declared_after_it() {
    struct Admin {
        id: i64,
        user: User,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("user", "", &mut self.user),
            ]
        }
    }

    let mut admin = Admin {
        id: 0,
        user: user(),
    };
    let table = Table::extract(&mut admin).unwrap();

    let pks = table.primary_keys();
    assert_eq!(pks.len(), 1);
    assert_eq!(pks[0].field_path(), "id");
}

#[test]
fn name_override_replaces_derived_name() {
    struct Person {
        id: i64,
        firstname: String,
    }
    impl Record for Person {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::scalar("firstname", "forename", &mut self.firstname),
            ]
        }
    }

    let mut person = Person {
        id: 0,
        firstname: String::new(),
    };
    let table = Table::extract(&mut person).unwrap();
    assert_eq!(table.columns()[1].name(), "forename");
}

#[test]
fn pk_with_name_override() {
    struct Person {
        id: i64,
    }
    impl Record for Person {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::scalar("id", "user_id,pk", &mut self.id)]
        }
    }

    let mut person = Person { id: 0 };
    let table = Table::extract(&mut person).unwrap();
    assert_eq!(table.primary_keys()[0].name(), "user_id");
}

#[test]
fn embedded_prefix_uses_field_columns_own_overrides() {
    struct Named {
        firstname: String,
    }
    impl Record for Named {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::scalar("firstname", "forename", &mut self.firstname)]
        }
    }
    struct Admin {
        id: i64,
        user: Named,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("user", "", &mut self.user),
            ]
        }
    }

    let mut admin = Admin {
        id: 0,
        user: Named {
            firstname: String::new(),
        },
    };
    let table = Table::extract(&mut admin).unwrap();
    assert_eq!(table.columns()[1].name(), "user_forename");
}

#[test]
fn embedded_prefix_override_renames_prefix() {
    struct Admin {
        id: i64,
        user: Address,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("user", "u", &mut self.user),
            ]
        }
    }

    let mut admin = Admin {
        id: 0,
        user: Address::default(),
    };
    let table = Table::extract(&mut admin).unwrap();
    assert_eq!(table.columns()[1].name(), "u_street");
    assert_eq!(table.columns()[2].name(), "u_city");
}

#[test]
fn underscore_override_suppresses_prefix() {
    struct Admin {
        id: i64,
        user: Address,
    }
    impl Record for Admin {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("user", "_", &mut self.user),
            ]
        }
    }

    let mut admin = Admin {
        id: 0,
        user: Address::default(),
    };
    let table = Table::extract(&mut admin).unwrap();
    assert_eq!(table.columns()[1].name(), "street");
    assert_eq!(table.columns()[2].name(), "city");
}

#[test]
fn excluded_fields_never_become_columns() {
    struct Cached {
        id: i64,
        etag: String,
        body: String,
    }
    impl Record for Cached {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::scalar("etag", "-", &mut self.etag),
                Field::scalar("body", "", &mut self.body),
            ]
        }
    }

    let mut cached = Cached {
        id: 0,
        etag: String::new(),
        body: String::new(),
    };
    let table = Table::extract(&mut cached).unwrap();

    assert_eq!(table.columns().len(), 2);
    assert!(table.columns().iter().all(|c| c.name() != "etag"));
}

#[test]
fn readonly_columns_follow_the_filter_flag() {
    struct Stamped {
        name: String,
        created_at: String,
    }
    impl Record for Stamped {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("name", "", &mut self.name),
                Field::scalar("created_at", ",readonly", &mut self.created_at),
            ]
        }
    }
    struct Doc {
        id: i64,
        stamped: Stamped,
        revision: i64,
    }
    impl Record for Doc {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("stamped", "", &mut self.stamped),
                Field::scalar("revision", ",readonly", &mut self.revision),
            ]
        }
    }

    let mut doc = Doc {
        id: 0,
        stamped: Stamped {
            name: String::new(),
            created_at: String::new(),
        },
        revision: 0,
    };
    let table = Table::extract(&mut doc).unwrap();

    let with_readonly = table.names(false, true);
    assert_eq!(with_readonly.len(), 3);

    let without_readonly = table.names(false, false);
    assert_eq!(without_readonly, vec!["stamped_name"]);
}

#[test]
fn unrecognized_flags_are_kept_but_change_nothing() {
    struct Tagged {
        id: i64,
        body: String,
    }
    impl Record for Tagged {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::scalar("body", ",audited", &mut self.body),
            ]
        }
    }

    let mut tagged = Tagged {
        id: 0,
        body: String::new(),
    };
    let table = Table::extract(&mut tagged).unwrap();

    let body = &table.columns()[1];
    assert_eq!(body.tags(), &["audited"]);
    assert!(!body.is_readonly());
    assert_eq!(table.names(false, false), vec!["body"]);
}

#[test]
fn non_key_embedded_columns_stay_marked_embedded() {
    struct Profile {
        id: i64,
        address: Address,
    }
    impl Record for Profile {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::embedded("address", "", &mut self.address),
            ]
        }
    }

    let mut profile = Profile {
        id: 0,
        address: Address::default(),
    };
    let table = Table::extract(&mut profile).unwrap();

    assert!(!table.columns()[0].is_from_embedded());
    assert!(table.columns()[1].is_from_embedded());
    assert!(table.columns()[2].is_from_embedded());
}

#[test]
fn empty_optional_record_is_allocated_during_extraction() {
    struct Customer {
        id: i64,
        billing: Option<Address>,
    }
    impl Record for Customer {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::scalar("id", "", &mut self.id),
                Field::nested("billing", "", &mut self.billing),
            ]
        }
    }

    let mut customer = Customer {
        id: 0,
        billing: None,
    };
    {
        let table = Table::extract(&mut customer).unwrap();
        assert_eq!(table.columns()[1].name(), "billing_street");
    }

    // the fresh instance was written back so later scans reach it
    assert!(customer.billing.is_some());
}

#[test]
fn values_read_the_live_record() {
    let mut u = user();
    u.id = 3;
    u.name = "rkusa".into();

    let table = Table::extract(&mut u).unwrap();
    assert_eq!(
        table.values(true, true),
        vec![SqlValue::Int(3), SqlValue::Text("rkusa".into())]
    );
    assert_eq!(table.values(false, true), vec![SqlValue::Text("rkusa".into())]);
    assert_eq!(table.quoted_names(true, true), vec!["\"id\"", "\"name\""]);
}
