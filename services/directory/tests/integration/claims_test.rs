use serde_json::json;
use uuid::Uuid;

use steeple_domain::membership::MembershipStatus;
use steeple_domain::role::ChurchRole;
use steeple_testing::claims::InMemoryClaims;

use steeple_directory::usecase::membership::{
    ApproveMembershipUseCase, RequestMembershipInput, RequestMembershipUseCase,
};

use crate::helpers::{
    MockChurchRepo, MockMemberRecordRepo, MockMembershipRepo, MockOutbox, MockStatsRepo,
    MockUserRepo, claims_gateway, test_church, test_user,
};

#[tokio::test]
async fn should_report_approval_success_even_when_claims_write_fails() {
    let user = test_user();
    let church = test_church("Riverside Local");
    let claims_store = InMemoryClaims::new();
    let memberships = MockMembershipRepo::new();
    let member_records = MockMemberRecordRepo::new();
    let stats = MockStatsRepo::new();
    stats.seed(church.id);

    let request = RequestMembershipUseCase {
        users: MockUserRepo::new(vec![user.clone()], MockOutbox::new()),
        churches: MockChurchRepo::new(vec![church.clone()]),
        memberships: memberships.clone(),
        member_records: member_records.clone(),
    };
    request
        .execute(RequestMembershipInput {
            user_id: user.id,
            church_id: church.id,
            answers: json!([]),
        })
        .await
        .unwrap();

    // Identity provider goes down before the approval lands.
    claims_store.set_fail_writes(true);

    let approve = ApproveMembershipUseCase {
        memberships: memberships.clone(),
        member_records: member_records.clone(),
        claims: claims_gateway(&claims_store),
        stats: stats.clone(),
    };
    approve
        .execute(church.id, user.id, ChurchRole::Member)
        .await
        .expect("approval must succeed; the claims failure is best-effort");

    // Store-side writes landed, counter moved, claims stayed stale.
    let records = member_records.rows_handle();
    assert_eq!(
        records.lock().unwrap()[0].status,
        MembershipStatus::Approved
    );
    assert_eq!(stats.member_count(church.id), 1);
    assert_eq!(
        claims_store.get(user.id).church_role(church.id),
        None,
        "claims lag until the next reconciliation or token refresh"
    );
}

#[tokio::test]
async fn should_preserve_other_church_roles_when_setting_one() {
    let user_id = Uuid::new_v4();
    let existing_church = Uuid::new_v4();
    let new_church = Uuid::new_v4();

    let claims_store = InMemoryClaims::new();
    let gateway = claims_gateway(&claims_store);

    gateway
        .set_church_role(user_id, existing_church, ChurchRole::Pastor)
        .await
        .unwrap();
    gateway
        .set_church_role(user_id, new_church, ChurchRole::Member)
        .await
        .unwrap();

    let claims = claims_store.get(user_id);
    assert_eq!(claims.church_role(existing_church), Some(ChurchRole::Pastor));
    assert_eq!(claims.church_role(new_church), Some(ChurchRole::Member));
}

#[tokio::test]
async fn should_tolerate_removing_absent_church_role() {
    let claims_store = InMemoryClaims::new();
    let gateway = claims_gateway(&claims_store);

    gateway
        .remove_church_role(Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect("removing an absent role is a no-op, not an error");
}

#[tokio::test]
async fn should_overwrite_role_on_reissue() {
    let user_id = Uuid::new_v4();
    let church_id = Uuid::new_v4();
    let claims_store = InMemoryClaims::new();
    let gateway = claims_gateway(&claims_store);

    gateway
        .set_church_role(user_id, church_id, ChurchRole::Visitor)
        .await
        .unwrap();
    gateway
        .set_church_role(user_id, church_id, ChurchRole::Leader)
        .await
        .unwrap();

    assert_eq!(
        claims_store.get(user_id).church_role(church_id),
        Some(ChurchRole::Leader)
    );
}
