//! JSON-file [`StateStore`] backend, one file per record under the
//! configured state directory.

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::{
    dto::{contest::AuthUser, practice::PracticeResult},
    store::{StateStore, StoreError, StoreResult},
};

const USER_FILE: &str = "auth-user.json";
const COMPLETED_FILE: &str = "completed-contests.json";
const PRACTICE_FILE: &str = "practice-results.json";

/// File-backed store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore {
            dir: Arc::new(dir.into()),
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    async fn read_record<T>(path: PathBuf, key: &str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let contents = match fs::read(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::unavailable(
                    format!("reading `{}`", path.display()),
                    err,
                ));
            }
        };

        serde_json::from_slice(&contents)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    async fn write_record<T>(dir: PathBuf, path: PathBuf, value: &T) -> StoreResult<()>
    where
        T: Serialize,
    {
        fs::create_dir_all(&dir)
            .await
            .map_err(|err| StoreError::unavailable(format!("creating `{}`", dir.display()), err))?;

        let contents = serde_json::to_vec(value).map_err(|source| StoreError::Corrupt {
            key: path.display().to_string(),
            source,
        })?;

        fs::write(&path, contents)
            .await
            .map_err(|err| StoreError::unavailable(format!("writing `{}`", path.display()), err))
    }
}

impl StateStore for FileStore {
    fn load_user(&self) -> BoxFuture<'static, StoreResult<Option<AuthUser>>> {
        let path = self.path(USER_FILE);
        Box::pin(async move { Self::read_record(path, USER_FILE).await })
    }

    fn save_user(&self, user: Option<AuthUser>) -> BoxFuture<'static, StoreResult<()>> {
        let dir = self.dir.as_ref().clone();
        let path = self.path(USER_FILE);
        Box::pin(async move {
            match user {
                Some(user) => Self::write_record(dir, path, &user).await,
                None => match fs::remove_file(&path).await {
                    Ok(()) => Ok(()),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                    Err(err) => Err(StoreError::unavailable(
                        format!("removing `{}`", path.display()),
                        err,
                    )),
                },
            }
        })
    }

    fn load_completed(&self) -> BoxFuture<'static, StoreResult<Vec<String>>> {
        let path = self.path(COMPLETED_FILE);
        Box::pin(async move {
            Ok(Self::read_record(path, COMPLETED_FILE)
                .await?
                .unwrap_or_default())
        })
    }

    fn save_completed(&self, ids: Vec<String>) -> BoxFuture<'static, StoreResult<()>> {
        let dir = self.dir.as_ref().clone();
        let path = self.path(COMPLETED_FILE);
        Box::pin(async move { Self::write_record(dir, path, &ids).await })
    }

    fn load_practice_results(&self) -> BoxFuture<'static, StoreResult<Vec<PracticeResult>>> {
        let path = self.path(PRACTICE_FILE);
        Box::pin(async move {
            Ok(Self::read_record(path, PRACTICE_FILE)
                .await?
                .unwrap_or_default())
        })
    }

    fn append_practice_result(
        &self,
        result: PracticeResult,
    ) -> BoxFuture<'static, StoreResult<()>> {
        let dir = self.dir.as_ref().clone();
        let path = self.path(PRACTICE_FILE);
        Box::pin(async move {
            let mut results: Vec<PracticeResult> = Self::read_record(path.clone(), PRACTICE_FILE)
                .await?
                .unwrap_or_default();
            results.push(result);
            Self::write_record(dir, path, &results).await
        })
    }
}
