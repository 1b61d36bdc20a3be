//! HTTP client for the MindMuse backend.
//!
//! One-shot reads and writes only: no automatic retries, and a failed
//! request never mutates ledger or cached state — the calling view decides
//! whether to prompt the user to try again. The cookie store carries the
//! session credential the way the browser client did.

use reqwest::Client;
use tracing::debug;
use validator::Validate;

use crate::{
    config::ClientConfig,
    dto::{
        contest::{AuthUser, ContestMeta, Question, Standing, UserAnswer},
        http::{
            CreateContestRequest, CreateContestResponse, CreateNptelContestRequest, ProfilePage,
            QuestionsResponse, StandingsResponse, SummaryResponse, VerifyResponse,
        },
        practice::{Course, CoursesResponse, PracticeQuestion, PracticeQuestionsResponse},
    },
    error::{ClientError, ClientResult},
};

/// Contest metadata plus its question batch, as returned by the questions
/// endpoints.
#[derive(Debug, Clone)]
pub struct ContestBundle {
    /// Contest metadata.
    pub meta: ContestMeta,
    /// Question batch in play order.
    pub questions: Vec<Question>,
}

/// Client for the backend's HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Build a client for the configured backend.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(ApiClient { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    fn bundle(response: QuestionsResponse) -> ClientResult<ContestBundle> {
        if !response.success {
            return Err(ClientError::NotFound(
                response
                    .message
                    .unwrap_or_else(|| "contest not found".into()),
            ));
        }
        let Some(mut meta) = response.meta else {
            return Err(ClientError::NotFound("contest not found".into()));
        };
        // The topic shown in the waiting room and invitations comes from the
        // first question; the server does not store it on the contest.
        if meta.topic.is_none() {
            meta.topic = response
                .questions
                .first()
                .map(|question| question.topic.clone());
        }
        Ok(ContestBundle {
            meta,
            questions: response.questions,
        })
    }

    /// Resolve a contest id into its metadata and question batch.
    pub async fn contest_questions(&self, contest_id: &str) -> ClientResult<ContestBundle> {
        let url = self.url(&format!("/api/contest/{contest_id}/questions"));
        debug!(contest_id, "fetching contest questions");
        let response: QuestionsResponse = self.client.get(url).send().await?.json().await?;
        Self::bundle(response)
    }

    /// Resolve a join code into contest metadata and questions.
    pub async fn contest_questions_by_code(&self, code: &str) -> ClientResult<ContestBundle> {
        let url = self.url(&format!("/api/contest/code/{code}/questions"));
        debug!(code, "resolving contest by code");
        let response: QuestionsResponse = self.client.get(url).send().await?.json().await?;
        Self::bundle(response)
    }

    /// Previously recorded answers for the current user in this contest.
    pub async fn contest_summary(&self, contest_id: &str) -> ClientResult<Vec<UserAnswer>> {
        let url = self.url(&format!("/api/contest/{contest_id}/summary"));
        let response: SummaryResponse = self.client.get(url).send().await?.json().await?;
        if response.success {
            Ok(response.user_answers)
        } else {
            Ok(Vec::new())
        }
    }

    /// One-shot standings read, used for ended contests and as the
    /// real-time fallback.
    pub async fn contest_standings(&self, contest_id: &str) -> ClientResult<Vec<Standing>> {
        let url = self.url(&format!("/api/contest/{contest_id}/standings"));
        let response: StandingsResponse = self.client.get(url).send().await?.json().await?;
        if response.success {
            Ok(response.standings)
        } else {
            Err(ClientError::NotFound("standings unavailable".into()))
        }
    }

    /// Create a contest with AI-generated questions, returning its join
    /// code.
    pub async fn create_contest(&self, request: &CreateContestRequest) -> ClientResult<String> {
        request.validate()?;
        let url = self.url("/api/quiz/createContest");
        let response: CreateContestResponse =
            self.client.post(url).json(request).send().await?.json().await?;
        match (response.success, response.code) {
            (true, Some(code)) => Ok(code),
            _ => Err(ClientError::api(
                response.message,
                "failed to create contest",
            )),
        }
    }

    /// Create a contest drawn from a course question bank.
    pub async fn create_nptel_contest(
        &self,
        request: &CreateNptelContestRequest,
    ) -> ClientResult<String> {
        request.validate()?;
        let url = self.url("/api/quiz/createNptelContest");
        let response: CreateContestResponse =
            self.client.post(url).json(request).send().await?.json().await?;
        match (response.success, response.code) {
            (true, Some(code)) => Ok(code),
            _ => Err(ClientError::api(
                response.message,
                "failed to create contest",
            )),
        }
    }

    /// Course catalogue for practice and curriculum contests.
    pub async fn courses(&self) -> ClientResult<Vec<Course>> {
        let url = self.url("/api/course/courses");
        let response: CoursesResponse = self.client.get(url).send().await?.json().await?;
        Ok(response.courses)
    }

    /// Question bank slice for a course and set of weeks. Practice questions
    /// carry their correct options and are graded locally.
    pub async fn practice_questions(
        &self,
        course_code: &str,
        weeks: &[u32],
    ) -> ClientResult<Vec<PracticeQuestion>> {
        let weeks_csv = weeks
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.url(&format!("/api/nptel/questions/{course_code}"));
        let response: PracticeQuestionsResponse = self
            .client
            .get(url)
            .query(&[("weeks", weeks_csv)])
            .send()
            .await?
            .json()
            .await?;
        Ok(response.questions)
    }

    /// Paginated contest history and aggregate insights.
    pub async fn profile(&self, page: u32, limit: u32) -> ClientResult<ProfilePage> {
        let url = self.url("/api/profile");
        let response: ProfilePage = self
            .client
            .get(url)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?
            .json()
            .await?;
        if response.success {
            Ok(response)
        } else {
            Err(ClientError::api(None, "failed to load profile"))
        }
    }

    /// Exchange a Google credential for a session cookie and user record.
    pub async fn google_login(&self, credential: &str) -> ClientResult<AuthUser> {
        let url = self.url("/api/auth/google");
        let response: VerifyResponse = self
            .client
            .post(url)
            .json(&serde_json::json!({ "credential": credential }))
            .send()
            .await?
            .json()
            .await?;
        match (response.success, response.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(ClientError::api(None, "sign-in failed")),
        }
    }

    /// Check whether the session cookie is still valid.
    pub async fn verify_session(&self) -> ClientResult<Option<AuthUser>> {
        let url = self.url("/api/auth/verify");
        let response: VerifyResponse = self.client.get(url).send().await?.json().await?;
        Ok(response.user.filter(|_| response.success))
    }

    /// Invalidate the server-side session.
    pub async fn logout(&self) -> ClientResult<()> {
        let url = self.url("/api/auth/logout");
        self.client.post(url).send().await?;
        Ok(())
    }

    /// Fire an analytics post. Callers are expected to go through
    /// [`crate::services::analytics`], which swallows failures.
    pub(crate) async fn post_analytics<T: serde::Serialize>(
        &self,
        path: &str,
        payload: &T,
    ) -> ClientResult<()> {
        let url = self.url(path);
        self.client.post(url).json(payload).send().await?;
        Ok(())
    }
}
