use sea_orm::DatabaseConnection;

use crate::infra::claims::HttpClaimsClient;
use crate::infra::db::{
    DbChurchRepository, DbEventRepository, DbMemberRecordRepository, DbMembershipRepository,
    DbOutboxRepository, DbSermonRepository, DbStatsRepository, DbUserRepository,
};
use crate::usecase::claims::ClaimsGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub claims: HttpClaimsClient,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn church_repo(&self) -> DbChurchRepository {
        DbChurchRepository {
            db: self.db.clone(),
        }
    }

    pub fn membership_repo(&self) -> DbMembershipRepository {
        DbMembershipRepository {
            db: self.db.clone(),
        }
    }

    pub fn member_record_repo(&self) -> DbMemberRecordRepository {
        DbMemberRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn stats_repo(&self) -> DbStatsRepository {
        DbStatsRepository {
            db: self.db.clone(),
        }
    }

    pub fn sermon_repo(&self) -> DbSermonRepository {
        DbSermonRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbEventRepository {
        DbEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn claims_port(&self) -> HttpClaimsClient {
        self.claims.clone()
    }

    pub fn claims_gateway(&self) -> ClaimsGateway<HttpClaimsClient> {
        ClaimsGateway {
            port: self.claims.clone(),
        }
    }
}
