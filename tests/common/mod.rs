//! Shared fixtures: an in-memory catalog and a recording transport.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ecg_tutor::bot::{MessageRef, RenderedView, Transport};
use ecg_tutor::catalog::{Case, Catalog, Quiz};
use ecg_tutor::config::BotSettings;
use ecg_tutor::context::AppContext;
use ecg_tutor::errors::TransportError;
use ecg_tutor::localization::LocalizationManager;
use ecg_tutor::media::ImageResource;

pub const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

pub fn sample_case(id: u32) -> Case {
    Case {
        id,
        title: format!("Case {id}"),
        description: format!("Description of case {id}"),
        image: PathBuf::from(format!("case_{id}.png")),
        quiz: Quiz {
            question: format!("What does case {id} show?"),
            options: vec![
                format!("Option A{id}"),
                format!("Option B{id}"),
                format!("Option C{id}"),
            ],
            answer_index: (id as usize) % 3,
        },
    }
}

pub fn sample_cases(count: u32) -> Vec<Case> {
    (1..=count).map(sample_case).collect()
}

/// English context over `count` cases whose images live in `image_dir`
pub fn context_with(count: u32, cases_per_page: usize, image_dir: &Path) -> Arc<AppContext> {
    context_with_settings(
        count,
        image_dir,
        BotSettings {
            cases_per_page,
            default_language: "en".to_string(),
            ..BotSettings::default()
        },
    )
}

pub fn context_with_settings(count: u32, image_dir: &Path, settings: BotSettings) -> Arc<AppContext> {
    let catalog = Catalog::from_cases(sample_cases(count), image_dir).unwrap();
    let localization = LocalizationManager::new("en").unwrap();
    Arc::new(AppContext::new(catalog, localization, settings))
}

/// Context whose case images do not exist
pub fn context(count: u32) -> Arc<AppContext> {
    context_with(count, 8, Path::new("/nonexistent/ecg-images"))
}

/// Write a valid PNG header for every case into `dir`
pub fn write_images(dir: &Path, count: u32) {
    for id in 1..=count {
        std::fs::write(dir.join(format!("case_{id}.png")), PNG_HEADER).unwrap();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendText(RenderedView),
    EditText(MessageRef, RenderedView),
    Delete(MessageRef),
    SendPhoto(String, RenderedView),
    Ack(Option<String>),
}

/// Transport that records every request and can be told to fail
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    fail_edit: bool,
    fail_delete: bool,
    fail_photo: bool,
    fail_send: bool,
    photo_delay: Option<Duration>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_edit(mut self) -> Self {
        self.fail_edit = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_photo(mut self) -> Self {
        self.fail_photo = true;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Hold every photo upload for `delay` before answering
    pub fn slow_photo(mut self, delay: Duration) -> Self {
        self.photo_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Text of the last view delivered by send, edit or photo
    pub fn last_text(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::SendText(view) | Call::EditText(_, view) | Call::SendPhoto(_, view) => Some(view.text),
            _ => None,
        })
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_text(&self, view: &RenderedView) -> Result<MessageRef, TransportError> {
        self.record(Call::SendText(view.clone()));
        if self.fail_send {
            return Err(TransportError("send failed".to_string()));
        }
        Ok(MessageRef(1000))
    }

    async fn edit_text(&self, target: MessageRef, view: &RenderedView) -> Result<(), TransportError> {
        self.record(Call::EditText(target, view.clone()));
        if self.fail_edit {
            return Err(TransportError("message can't be edited".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, target: MessageRef) -> Result<(), TransportError> {
        self.record(Call::Delete(target));
        if self.fail_delete {
            return Err(TransportError("message to delete not found".to_string()));
        }
        Ok(())
    }

    async fn send_photo(
        &self,
        image: ImageResource,
        view: &RenderedView,
    ) -> Result<MessageRef, TransportError> {
        self.record(Call::SendPhoto(image.file_name, view.clone()));
        if let Some(delay) = self.photo_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_photo {
            return Err(TransportError("wrong file identifier".to_string()));
        }
        Ok(MessageRef(2000))
    }

    async fn acknowledge(&self, alert: Option<&str>) -> Result<(), TransportError> {
        self.record(Call::Ack(alert.map(str::to_string)));
        Ok(())
    }
}
