//! Todoist REST API client: the task-tracker capability receiving
//! dispatched action items.

use async_trait::async_trait;
use copilot_ai::traits::task_tracker::Provider;
use copilot_ai::{Error, TaskRef};
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CreateTaskRequest<'a> {
    content: &'a str,
    project_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    id: String,
    content: String,
    #[serde(default)]
    url: Option<String>,
}

impl From<TaskResponse> for TaskRef {
    fn from(task: TaskResponse) -> Self {
        TaskRef {
            id: task.id,
            content: task.content,
            url: task.url,
        }
    }
}

/// Todoist REST API client
pub struct TodoistClient {
    client: reqwest::Client,
    base_url: String,
}

impl TodoistClient {
    /// Create a new Todoist client with the given API token and base URL
    pub fn new(api_token: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {api_token}")).map_err(
                |e| {
                    warn!("Failed to create auth header: {:?}", e);
                    Error::Configuration("Invalid API token format".to_string())
                },
            )?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

/// Map an HTTP error status to the capability error taxonomy.
fn error_for_status(status: reqwest::StatusCode, body: String) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Authentication(body),
        404 => Error::NotFound(body),
        429 => Error::RateLimited {
            retry_after_seconds: 60,
        },
        500..=599 => Error::Network(format!("Todoist returned {status}: {body}")),
        _ => Error::Provider(format!("Todoist returned {status}: {body}")),
    }
}

#[async_trait]
impl Provider for TodoistClient {
    async fn create_task(&self, project_id: &str, content: &str) -> Result<TaskRef, Error> {
        let url = format!("{}/tasks", self.base_url);

        debug!("Creating Todoist task in project {project_id}");

        let request = CreateTaskRequest {
            content,
            project_id,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Todoist: {:?}", e);
                Error::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Todoist API: {status} {body}");
            return Err(error_for_status(status, body));
        }

        let task: TaskResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Todoist response: {:?}", e);
            Error::Deserialization("Invalid response from Todoist".to_string())
        })?;

        info!("Created Todoist task {}", task.id);
        Ok(task.into())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<TaskRef>, Error> {
        let url = format!("{}/tasks", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("project_id", project_id)])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Todoist: {:?}", e);
                Error::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Todoist API: {status} {body}");
            return Err(error_for_status(status, body));
        }

        let tasks: Vec<TaskResponse> = response.json().await.map_err(|e| {
            warn!("Failed to parse Todoist response: {:?}", e);
            Error::Deserialization("Invalid response from Todoist".to_string())
        })?;

        Ok(tasks.into_iter().map(Into::into).collect())
    }

    async fn complete_task(&self, task_id: &str) -> Result<(), Error> {
        let url = format!("{}/tasks/{}/close", self.base_url, task_id);

        let response = self.client.post(&url).send().await.map_err(|e| {
            warn!("Failed to reach Todoist: {:?}", e);
            Error::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Todoist API: {status} {body}");
            return Err(error_for_status(status, body));
        }

        info!("Completed Todoist task {task_id}");
        Ok(())
    }

    fn provider_id(&self) -> &str {
        "todoist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_serializes_content_and_project() {
        let request = CreateTaskRequest {
            content: "Draft the rollout plan",
            project_id: "proj-1",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["content"], "Draft the rollout plan");
        assert_eq!(json["project_id"], "proj-1");
    }

    #[test]
    fn task_response_converts_to_task_ref() {
        let json = r#"{
            "id": "7421",
            "content": "Draft the rollout plan",
            "url": "https://todoist.com/showTask?id=7421"
        }"#;
        let task: TaskResponse = serde_json::from_str(json).unwrap();
        let task_ref: TaskRef = task.into();

        assert_eq!(task_ref.id, "7421");
        assert_eq!(task_ref.content, "Draft the rollout plan");
        assert!(task_ref.url.is_some());
    }

    #[test]
    fn missing_task_maps_to_not_found() {
        use reqwest::StatusCode;

        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, String::new()),
            Error::NotFound(_)
        ));
    }
}
