use chrono::{Duration, Utc};

use steeple_directory::domain::repository::{StatCounter, StatsRepository};
use steeple_directory::error::DirectoryServiceError;
use steeple_directory::usecase::event::{CreateEventInput, CreateEventUseCase};
use steeple_directory::usecase::outbox::{MAX_ATTEMPTS, OutboxDispatcher};
use steeple_directory::usecase::sermon::{
    CreateSermonInput, CreateSermonUseCase, DeleteSermonUseCase,
};
use steeple_directory::usecase::stats::RecomputeStatsUseCase;
use steeple_directory::usecase::sync::SyncProfileUseCase;
use steeple_directory::usecase::user::{UpdateProfileInput, UpdateProfileUseCase};

use crate::helpers::{
    MockChurchRepo, MockEventRepo, MockMemberRecordRepo, MockMembershipRepo, MockOutbox,
    MockSermonRepo, MockStatsRepo, MockUserRepo, pending_membership, pending_record,
    test_church, test_user,
};

struct Pipeline {
    outbox: MockOutbox,
    users: MockUserRepo,
    churches: MockChurchRepo,
    memberships: MockMembershipRepo,
    member_records: MockMemberRecordRepo,
    sermons: MockSermonRepo,
    events: MockEventRepo,
    stats: MockStatsRepo,
}

fn pipeline(
    users: Vec<steeple_directory::domain::types::User>,
    churches: Vec<steeple_directory::domain::types::Church>,
) -> Pipeline {
    let outbox = MockOutbox::new();
    let stats = MockStatsRepo::with_outbox(outbox.clone());
    for church in &churches {
        stats.seed(church.id);
    }
    Pipeline {
        users: MockUserRepo::new(users, outbox.clone()),
        churches: MockChurchRepo::new(churches),
        memberships: MockMembershipRepo::new(),
        member_records: MockMemberRecordRepo::new(),
        sermons: MockSermonRepo::new(outbox.clone()),
        events: MockEventRepo::new(outbox.clone()),
        stats,
        outbox,
    }
}

impl Pipeline {
    fn dispatcher(
        &self,
    ) -> OutboxDispatcher<
        MockOutbox,
        MockMembershipRepo,
        MockMemberRecordRepo,
        MockSermonRepo,
        MockStatsRepo,
    > {
        OutboxDispatcher {
            outbox: self.outbox.clone(),
            sync: SyncProfileUseCase {
                memberships: self.memberships.clone(),
                member_records: self.member_records.clone(),
                sermons: self.sermons.clone(),
            },
            stats: self.stats.clone(),
        }
    }
}

#[tokio::test]
async fn should_apply_sermon_counter_from_lifecycle_events() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let p = pipeline(vec![user.clone()], vec![church.clone()]);

    let create = CreateSermonUseCase {
        churches: p.churches.clone(),
        users: p.users.clone(),
        sermons: p.sermons.clone(),
    };
    let sermon = create
        .execute(CreateSermonInput {
            church_id: church.id,
            title: "On Grace".to_owned(),
            speaker_user_id: Some(user.id),
            guest_speaker: None,
            preached_at: Utc::now(),
        })
        .await
        .unwrap();
    assert_eq!(sermon.speaker_name, user.display_name);

    let outcome = p.dispatcher().drain(Utc::now()).await.unwrap();
    assert_eq!(outcome.processed, 1);
    assert_eq!(p.stats.sermon_count(church.id), 1);
    assert_eq!(p.outbox.unprocessed(), 0);

    let delete = DeleteSermonUseCase {
        sermons: p.sermons.clone(),
    };
    delete.execute(sermon.id).await.unwrap();
    p.dispatcher().drain(Utc::now()).await.unwrap();
    assert_eq!(p.stats.sermon_count(church.id), 0);
}

#[tokio::test]
async fn should_apply_event_counter_from_lifecycle_events() {
    let church = test_church("Riverside Local");
    let p = pipeline(vec![], vec![church.clone()]);

    let create = CreateEventUseCase {
        churches: p.churches.clone(),
        events: p.events.clone(),
    };
    create
        .execute(CreateEventInput {
            church_id: church.id,
            title: "Harvest Festival".to_owned(),
            starts_at: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap();

    p.dispatcher().drain(Utc::now()).await.unwrap();
    assert_eq!(p.stats.event_count(church.id), 1);
    assert_eq!(
        p.stats.acked.lock().unwrap().len(),
        1,
        "the delta and the ack land together"
    );
}

#[tokio::test]
async fn should_not_double_apply_counters_on_duplicate_delivery() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let p = pipeline(vec![user.clone()], vec![church.clone()]);

    let create = CreateSermonUseCase {
        churches: p.churches.clone(),
        users: p.users.clone(),
        sermons: p.sermons.clone(),
    };
    let sermon = create
        .execute(CreateSermonInput {
            church_id: church.id,
            title: "On Grace".to_owned(),
            speaker_user_id: None,
            guest_speaker: Some("Guest Preacher".to_owned()),
            preached_at: Utc::now(),
        })
        .await
        .unwrap();

    // Duplicate emission is rejected by the unique idempotency key.
    p.outbox
        .push(&steeple_directory::domain::events::sermon_created(
            church.id, sermon.id,
        ));
    assert_eq!(p.outbox.rows_handle().lock().unwrap().len(), 1);

    // Duplicate drain finds nothing: the ack landed with the delta.
    p.dispatcher().drain(Utc::now()).await.unwrap();
    p.dispatcher().drain(Utc::now()).await.unwrap();
    assert_eq!(p.stats.sermon_count(church.id), 1);
}

#[tokio::test]
async fn should_run_profile_sync_through_the_event_log() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let p = pipeline(vec![user.clone()], vec![church.clone()]);

    p.memberships
        .rows
        .lock()
        .unwrap()
        .push(pending_membership(&user, &church));
    p.member_records
        .rows
        .lock()
        .unwrap()
        .push(pending_record(&user, &church));

    let update = UpdateProfileUseCase {
        users: p.users.clone(),
    };
    update
        .execute(
            user.id,
            UpdateProfileInput {
                display_name: Some("Hana Lee".to_owned()),
                first_name: None,
                last_name: None,
                email: None,
                photo_url: None,
            },
        )
        .await
        .unwrap();

    let outcome = p.dispatcher().drain(Utc::now()).await.unwrap();
    assert_eq!(outcome.processed, 1);

    let records = p.member_records.rows_handle();
    assert_eq!(records.lock().unwrap()[0].display_name, "Hana Lee");
    assert_eq!(p.outbox.unprocessed(), 0);
}

#[tokio::test]
async fn should_back_off_and_terminally_fail_after_max_attempts() {
    let church = test_church("Riverside Local");
    let p = pipeline(vec![], vec![church.clone()]);

    let create = CreateEventUseCase {
        churches: p.churches.clone(),
        events: p.events.clone(),
    };
    create
        .execute(CreateEventInput {
            church_id: church.id,
            title: "Harvest Festival".to_owned(),
            starts_at: Utc::now(),
        })
        .await
        .unwrap();

    p.stats.set_fail_writes(true);

    // Each pass runs far enough in the future to clear the backoff window.
    for i in 1..=MAX_ATTEMPTS {
        let outcome = p
            .dispatcher()
            .drain(Utc::now() + Duration::days(i as i64))
            .await
            .unwrap();
        assert_eq!(outcome.failed, 1, "attempt {i} should fail");
    }

    let rows = p.outbox.rows_handle();
    {
        let rows = rows.lock().unwrap();
        assert_eq!(rows[0].attempts, MAX_ATTEMPTS);
        assert!(rows[0].failed_at.is_some(), "event must be terminally failed");
        assert!(rows[0].last_error.is_some());
    }

    // Recovery does not resurrect terminally-failed events.
    p.stats.set_fail_writes(false);
    let outcome = p
        .dispatcher()
        .drain(Utc::now() + Duration::days(30))
        .await
        .unwrap();
    assert_eq!(outcome.processed, 0);
    assert_eq!(p.stats.event_count(church.id), 0);
}

#[tokio::test]
async fn should_restore_drifted_counters_on_recompute() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let p = pipeline(vec![user.clone()], vec![church.clone()]);

    // Source tables: one approved member, two sermons, one event.
    let mut record = pending_record(&user, &church);
    record.status = steeple_domain::membership::MembershipStatus::Approved;
    p.member_records.rows.lock().unwrap().push(record);
    for title in ["On Grace", "On Hope"] {
        p.sermons
            .sermons
            .lock()
            .unwrap()
            .push(steeple_directory::domain::types::Sermon {
                id: uuid::Uuid::new_v4(),
                church_id: church.id,
                title: title.to_owned(),
                speaker_user_id: None,
                speaker_name: "Guest Preacher".to_owned(),
                preached_at: Utc::now(),
                created_at: Utc::now(),
            });
    }
    p.events
        .events
        .lock()
        .unwrap()
        .push(steeple_directory::domain::types::ChurchEvent {
            id: uuid::Uuid::new_v4(),
            church_id: church.id,
            title: "Harvest Festival".to_owned(),
            starts_at: Utc::now(),
            created_at: Utc::now(),
        });

    // Drift the counters the way lost deltas would.
    p.stats
        .add(church.id, StatCounter::Members, 41)
        .await
        .unwrap();
    p.stats
        .add(church.id, StatCounter::Sermons, -3)
        .await
        .unwrap();

    let recompute = RecomputeStatsUseCase {
        member_records: p.member_records.clone(),
        sermons: p.sermons.clone(),
        events: p.events.clone(),
        stats: p.stats.clone(),
    };
    let stats = recompute.execute(church.id).await.unwrap();

    assert_eq!(stats.member_count, 1);
    assert_eq!(stats.sermon_count, 2);
    assert_eq!(stats.event_count, 1);
    assert_eq!(p.stats.member_count(church.id), 1);
    assert_eq!(p.stats.sermon_count(church.id), 2);
    assert_eq!(p.stats.event_count(church.id), 1);
}

#[tokio::test]
async fn should_require_a_speaker_for_new_sermons() {
    let church = test_church("Riverside Local");
    let p = pipeline(vec![], vec![church.clone()]);

    let create = CreateSermonUseCase {
        churches: p.churches.clone(),
        users: p.users.clone(),
        sermons: p.sermons.clone(),
    };
    let result = create
        .execute(CreateSermonInput {
            church_id: church.id,
            title: "On Grace".to_owned(),
            speaker_user_id: None,
            guest_speaker: None,
            preached_at: Utc::now(),
        })
        .await;
    assert!(matches!(result, Err(DirectoryServiceError::MissingData)));
    assert_eq!(
        p.outbox.rows_handle().lock().unwrap().len(),
        0,
        "failed creates must not emit events"
    );
}
