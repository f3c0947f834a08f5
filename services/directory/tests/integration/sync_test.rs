use chrono::Utc;
use uuid::Uuid;

use steeple_directory::domain::types::ProfileChanges;
use steeple_directory::usecase::sync::{SYNC_BATCH_LIMIT, SyncProfileUseCase};
use steeple_directory::usecase::user::{UpdateProfileInput, UpdateProfileUseCase};

use crate::helpers::{
    MockMemberRecordRepo, MockMembershipRepo, MockOutbox, MockSermonRepo, MockUserRepo,
    pending_membership, pending_record, test_church, test_user,
};

fn sync_usecase(
    memberships: &MockMembershipRepo,
    member_records: &MockMemberRecordRepo,
    sermons: &MockSermonRepo,
) -> SyncProfileUseCase<MockMembershipRepo, MockMemberRecordRepo, MockSermonRepo> {
    SyncProfileUseCase {
        memberships: memberships.clone(),
        member_records: member_records.clone(),
        sermons: sermons.clone(),
    }
}

#[tokio::test]
async fn should_propagate_display_name_to_every_member_record() {
    let user = test_user();
    let memberships = MockMembershipRepo::new();
    let member_records = MockMemberRecordRepo::new();
    let sermons = MockSermonRepo::new(MockOutbox::new());

    for name in ["First Local", "Second Local", "Third Local"] {
        let church = test_church(name);
        memberships
            .rows
            .lock()
            .unwrap()
            .push(pending_membership(&user, &church));
        member_records
            .rows
            .lock()
            .unwrap()
            .push(pending_record(&user, &church));
    }

    let changes = ProfileChanges {
        display_name: Some("Hana Lee".to_owned()),
        ..ProfileChanges::default()
    };
    let outcome = sync_usecase(&memberships, &member_records, &sermons)
        .execute(user.id, &changes, Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.member_records, 3);
    assert_eq!(outcome.batches, 1);

    for record in member_records.rows_handle().lock().unwrap().iter() {
        assert_eq!(record.display_name, "Hana Lee");
        assert_eq!(record.email, user.email, "email must stay untouched");
    }
}

#[tokio::test]
async fn should_chunk_fanout_beyond_the_batch_limit() {
    let user = test_user();
    let memberships = MockMembershipRepo::new();
    let member_records = MockMemberRecordRepo::new();
    let sermons = MockSermonRepo::new(MockOutbox::new());

    let fan_out = SYNC_BATCH_LIMIT * 2 + 100;
    for i in 0..fan_out {
        let church = test_church(&format!("Local {i}"));
        memberships
            .rows
            .lock()
            .unwrap()
            .push(pending_membership(&user, &church));
        member_records
            .rows
            .lock()
            .unwrap()
            .push(pending_record(&user, &church));
    }

    let changes = ProfileChanges {
        display_name: Some("Hana Lee".to_owned()),
        ..ProfileChanges::default()
    };
    let outcome = sync_usecase(&memberships, &member_records, &sermons)
        .execute(user.id, &changes, Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.member_records, fan_out);
    assert_eq!(outcome.batches, 3, "excess fan-out is chunked, not dropped");

    let batch_sizes = member_records.batch_sizes_handle();
    let batch_sizes = batch_sizes.lock().unwrap();
    assert_eq!(*batch_sizes, vec![SYNC_BATCH_LIMIT, SYNC_BATCH_LIMIT, 100]);

    // Every single record was reached.
    assert!(
        member_records
            .rows_handle()
            .lock()
            .unwrap()
            .iter()
            .all(|r| r.display_name == "Hana Lee")
    );
}

#[tokio::test]
async fn should_update_sermon_speaker_names_only_for_display_name_changes() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let memberships = MockMembershipRepo::new();
    let member_records = MockMemberRecordRepo::new();
    let sermons = MockSermonRepo::new(MockOutbox::new());

    memberships
        .rows
        .lock()
        .unwrap()
        .push(pending_membership(&user, &church));
    member_records
        .rows
        .lock()
        .unwrap()
        .push(pending_record(&user, &church));
    sermons
        .sermons
        .lock()
        .unwrap()
        .push(steeple_directory::domain::types::Sermon {
            id: Uuid::new_v4(),
            church_id: church.id,
            title: "On Grace".to_owned(),
            speaker_user_id: Some(user.id),
            speaker_name: user.display_name.clone(),
            preached_at: Utc::now(),
            created_at: Utc::now(),
        });

    // Email-only change: sermons never cache email.
    let email_only = ProfileChanges {
        email: Some("hana.new@example.com".to_owned()),
        ..ProfileChanges::default()
    };
    let outcome = sync_usecase(&memberships, &member_records, &sermons)
        .execute(user.id, &email_only, Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome.sermons_updated, 0);

    let rename = ProfileChanges {
        display_name: Some("Hana Lee".to_owned()),
        ..ProfileChanges::default()
    };
    let outcome = sync_usecase(&memberships, &member_records, &sermons)
        .execute(user.id, &rename, Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome.sermons_updated, 1);
    assert_eq!(
        sermons.sermons_handle().lock().unwrap()[0].speaker_name,
        "Hana Lee"
    );
}

#[tokio::test]
async fn should_emit_no_event_when_no_tracked_field_changed() {
    let user = test_user();
    let outbox = MockOutbox::new();
    let users = MockUserRepo::new(vec![user.clone()], outbox.clone());

    let usecase = UpdateProfileUseCase {
        users: users.clone(),
    };
    let changes = usecase
        .execute(
            user.id,
            UpdateProfileInput {
                display_name: Some(user.display_name.clone()),
                first_name: Some(user.first_name.clone()),
                last_name: None,
                email: Some(user.email.clone()),
                photo_url: None,
            },
        )
        .await
        .unwrap();

    assert!(changes.is_empty());
    assert_eq!(
        outbox.rows_handle().lock().unwrap().len(),
        0,
        "no-op edits must not reach the event log"
    );
}

#[tokio::test]
async fn should_write_profile_and_event_atomically_on_real_change() {
    let user = test_user();
    let outbox = MockOutbox::new();
    let users = MockUserRepo::new(vec![user.clone()], outbox.clone());

    let usecase = UpdateProfileUseCase {
        users: users.clone(),
    };
    let changes = usecase
        .execute(
            user.id,
            UpdateProfileInput {
                display_name: Some("Hana Lee".to_owned()),
                first_name: None,
                last_name: None,
                email: None,
                photo_url: Some(Some("https://cdn.example.com/hana.jpg".to_owned())),
            },
        )
        .await
        .unwrap();

    assert_eq!(changes.display_name.as_deref(), Some("Hana Lee"));
    assert_eq!(
        changes.photo_url,
        Some(Some("https://cdn.example.com/hana.jpg".to_owned()))
    );

    let stored = users.users_handle();
    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].display_name, "Hana Lee");

    let rows = outbox.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, "profile_updated");
}
