//! UseCase: セッションのメンバー取得

use std::sync::Arc;

use crate::domain::{Participant, SessionId, SessionRepository};

/// メンバー取得のユースケース
pub struct GetSessionMembersUseCase {
    /// Repository（セッションハブへのアクセスの抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionMembersUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Current members in join order; empty for an unknown session
    pub async fn execute(&self, session_id: &SessionId) -> Vec<Participant> {
        self.repository.participants_of(session_id).await
    }
}
