use bytes::Bytes;
use wednesday_model::ModelProvider;

use crate::conversation::Turn;
use crate::media::{self, MediaError};
use crate::model_client::ModelClient;
use crate::persistence::{CaseRecord, CaseStore, CaseStoreClient};
use crate::reply::render_reply;
use crate::request::{DEFAULT_IMAGE_PROMPT, build_model_request};
use crate::session::{Session, UserInput};
use crate::speech::{SpeechClient, SpeechError, SpeechSynthesizer};

/// [`Orchestrator`] builder.
pub struct OrchestratorBuilder {
    model_client: ModelClient,
    speech_client: Option<SpeechClient>,
    case_store: Option<CaseStoreClient>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            speech_client: None,
            case_store: None,
        }
    }

    /// Sets the speech synthesizer. Without one, answers carry no audio.
    #[inline]
    pub fn with_speech<S: SpeechSynthesizer>(mut self, synthesizer: S) -> Self {
        self.speech_client = Some(SpeechClient::new(synthesizer));
        self
    }

    /// Sets the store completed exchanges are written to. Without one,
    /// nothing is persisted.
    #[inline]
    pub fn with_case_store<C: CaseStore>(mut self, store: C) -> Self {
        self.case_store = Some(CaseStoreClient::new(store));
        self
    }

    /// Builds the orchestrator.
    #[inline]
    pub fn build(self) -> Orchestrator {
        Orchestrator {
            model_client: self.model_client,
            speech_client: self.speech_client,
            case_store: self.case_store,
        }
    }
}

/// Drives exchanges between the operator and the model.
///
/// The orchestrator holds no conversation state itself; every exchange
/// operates on the [`Session`] passed in. Remote calls happen one after
/// another and are never retried.
#[derive(Clone)]
pub struct Orchestrator {
    model_client: ModelClient,
    speech_client: Option<SpeechClient>,
    case_store: Option<CaseStoreClient>,
}

/// The result of [`Orchestrator::process`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The input carried nothing new.
    Skipped,
    /// The input only carried an upload, which is not a readable image.
    InvalidUpload(MediaError),
    /// An exchange was completed.
    Exchanged(Exchange),
}

/// A completed round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// The text shown for the assistant's turn. Failed model calls
    /// produce a diagnostic here.
    pub reply: String,
    /// The spoken reply.
    pub audio: Option<Bytes>,
    /// Set if the upload sent along with text could not be read. The text
    /// was processed alone.
    pub upload_error: Option<MediaError>,
    /// Set if speech synthesis failed.
    pub speech_error: Option<SpeechError>,
}

impl Orchestrator {
    /// Processes one UI cycle worth of input.
    ///
    /// On success, exactly one user turn and one assistant turn are
    /// appended to the session.
    pub async fn process(
        &self,
        session: &mut Session,
        input: UserInput,
    ) -> Outcome {
        let (mut text, upload) = input.into_parts();

        let mut image = None;
        let mut upload_error = None;
        if let Some(upload) = upload.filter(|u| !session.is_processed(u)) {
            // Record the upload even if it is broken, so it is not retried
            // on every cycle.
            session.last_upload = Some(upload.fingerprint());
            match media::encode_png(upload.bytes()) {
                Ok(png) => image = Some(png),
                Err(err) => {
                    warn!("failed to read upload {}: {err}", upload.name());
                    upload_error = Some(err);
                }
            }
        }

        if image.is_some() && text.is_none() {
            text = Some(DEFAULT_IMAGE_PROMPT.to_owned());
        }
        let Some(query) = text else {
            return match upload_error {
                Some(err) => Outcome::InvalidUpload(err),
                None => Outcome::Skipped,
            };
        };

        debug!("processing: {query}");
        session.conversation.push(Turn::user(
            Some(query.clone()),
            image.as_deref().map(media::encode_base64),
        ));

        let turns = session.conversation.turns();
        let history = &turns[..turns.len() - 1];
        let request =
            build_model_request(history, Some(&query), image.as_deref());
        let reply = render_reply(self.model_client.send_request(request).await);

        let (audio, speech_error) = match &self.speech_client {
            Some(speech_client) => match speech_client.render(&reply).await {
                Ok(audio) => (audio, None),
                Err(err) => {
                    warn!("failed to synthesize speech: {err}");
                    (None, Some(err))
                }
            },
            None => (None, None),
        };

        session
            .conversation
            .push(Turn::assistant(reply.clone(), audio.clone()));

        if let Some(case_store) = &self.case_store {
            let record = CaseRecord {
                agent_id: session.agent_id().to_owned(),
                query,
                response: reply.clone(),
            };
            if let Err(err) = case_store.save(record).await {
                warn!("failed to persist exchange: {err}");
            }
        }

        Outcome::Exchanged(Exchange {
            reply,
            audio,
            upload_error,
            speech_error,
        })
    }
}
