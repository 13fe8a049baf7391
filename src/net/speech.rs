//! Assessment and practice calls against the speech-analysis backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The assessment page fetches a sentence, uploads the user's recording, and
//! keeps the weak phonemes from the analysis. The recommendation page turns
//! those phonemes into practice sentences and scores practice recordings.
//! Audio is an opaque `Blob`; nothing here inspects it.
//!
//! Upload replies carry headline metrics under `data`. Some backend versions
//! add a per-phoneme and per-word breakdown, either under `data` or at the
//! root; it is located with the same key-path lists `net::normalize` uses, and
//! the whole report is kept in sessionStorage so `/recommendations` survives
//! a reload.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "speech_test.rs"]
mod speech_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::{ApiClient, Reply};
use super::normalize::{KeyPath, lookup};
use crate::config::{self, ClientConfig};
use crate::error::SpeechError;
use crate::util::storage::{self, KeyValueStorage, LAST_ASSESSMENT_KEY, WEAK_PHONEMES_KEY};

pub const ASSESSMENT_SENTENCE_ENDPOINT: &str = "/assessment/recommend";
pub const ASSESSMENT_UPLOAD_ENDPOINT: &str = "/assessement/upload";
pub const PRACTICE_RECOMMENDATION_ENDPOINT: &str = "/practice/recommendation";
pub const PRACTICE_SUBMIT_ENDPOINT: &str = "/practice/submit";

/// User id sent with uploads when neither the session nor storage has one.
const DEFAULT_UPLOAD_USER_ID: &str = "1";
const CREATED_STATUS: i64 = 201;

/// Phoneme accuracy below which a sound is listed for practice.
pub const PRACTICE_ACCURACY_THRESHOLD: f64 = 80.0;
const MAX_PRACTICE_WORDS: usize = 20;

const PHONEME_LIST_PATHS: &[KeyPath] =
    &[&["data", "phonemes"], &["data", "phoneme_results"], &["phonemes"], &["phoneme_results"]];
const WORD_LIST_PATHS: &[KeyPath] = &[&["data", "words"], &["data", "word_results"], &["words"], &["word_results"]];
const OVERALL_SCORE_PATHS: &[KeyPath] = &[&["data", "overall_score"], &["data", "sentence_score"], &["overall_score"]];
const MISTAKES_SUMMARY_PATHS: &[KeyPath] = &[&["data", "mistakes_summary"], &["mistakes_summary"], &["summary"]];
const REFERENCE_AUDIO_PATHS: &[KeyPath] = &[
    &["data", "reference_audio_url"],
    &["data", "referenceAudioUrl"],
    &["data", "reference_audio"],
    &["data", "reference_url"],
    &["data", "reference"],
    &["reference_audio_url"],
    &["referenceAudioUrl"],
    &["reference_audio"],
    &["reference_url"],
    &["reference"],
];
const PHONEME_SYMBOL_KEYS: &[&str] = &["symbol", "phoneme", "phone"];
const PHONEME_ACCURACY_KEYS: &[&str] = &["accuracy", "score"];
const WORD_TEXT_KEYS: &[&str] = &["text", "word"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssessmentSentence {
    pub id: i64,
    pub text: String,
    pub difficulty: String,
}

/// Sentence used when the backend has none to offer.
pub fn fallback_sentence() -> AssessmentSentence {
    AssessmentSentence {
        id: 1,
        text: "The quick brown fox jumps over the lazy dog.".to_owned(),
        difficulty: "easy".to_owned(),
    }
}

/// Scores returned for an assessment or practice recording.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechMetrics {
    pub fluency_score: Option<f64>,
    pub phoneme_accuracy: Option<f64>,
    pub word_accuracy: Option<f64>,
    pub weak_phonemes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhonemeResult {
    pub symbol: String,
    pub accuracy: f64,
}

impl PhonemeResult {
    pub fn needs_practice(&self) -> bool {
        self.accuracy < PRACTICE_ACCURACY_THRESHOLD
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordResult {
    pub text: String,
    pub correct: bool,
}

/// Optional breakdown of an assessment. Every part may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedResults {
    pub overall_score: Option<f64>,
    pub mistakes_summary: Option<String>,
    pub phonemes: Vec<PhonemeResult>,
    pub words: Vec<WordResult>,
    /// Absolute URL of the backend's reference recording.
    pub reference_audio_url: Option<String>,
}

impl DetailedResults {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Phonemes under the practice threshold, weakest first.
    pub fn phonemes_to_practice(&self) -> Vec<&PhonemeResult> {
        let mut weak: Vec<_> = self.phonemes.iter().filter(|p| p.needs_practice()).collect();
        weak.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
        weak
    }

    pub fn words_to_practice(&self) -> Vec<&WordResult> {
        self.words.iter().filter(|w| !w.correct).take(MAX_PRACTICE_WORDS).collect()
    }
}

/// Everything the recommendation page needs from the last assessment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentReport {
    pub sentence: String,
    pub metrics: SpeechMetrics,
    pub details: DetailedResults,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeSentence {
    pub sentence_id: Option<i64>,
    pub text: String,
}

/// Clients for the API host and the (possibly separate) upload host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechApi {
    api: ApiClient,
    uploads: ApiClient,
}

impl SpeechApi {
    pub fn new(api: ApiClient, uploads: ApiClient) -> Self {
        Self { api, uploads }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ApiClient::new(&config.api_base_url), ApiClient::new(&config.assessment_base_url))
    }

    /// Fetch the next assessment sentence, falling back to the built-in one.
    pub async fn fetch_assessment_sentence(&self) -> AssessmentSentence {
        let body = match self.api.get(ASSESSMENT_SENTENCE_ENDPOINT).await.and_then(Reply::into_success) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("assessment sentence unavailable: {e}");
                return fallback_sentence();
            }
        };
        parse_sentence(&body).unwrap_or_else(fallback_sentence)
    }

    /// Upload an assessment recording of `sentence` and return the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the backend rejects it.
    #[cfg(feature = "csr")]
    pub async fn upload_assessment(
        &self,
        user_id: &str,
        sentence: &AssessmentSentence,
        audio: &web_sys::Blob,
    ) -> Result<AssessmentReport, SpeechError> {
        let form = web_sys::FormData::new().map_err(form_error)?;
        form.append_with_str("user_id", user_id).map_err(form_error)?;
        form.append_with_str("sentence_id", &sentence.id.to_string()).map_err(form_error)?;
        form.append_with_blob_and_filename("audio_file", audio, "assessment_audio.wav")
            .map_err(form_error)?;
        let body = self.uploads.post_form(ASSESSMENT_UPLOAD_ENDPOINT, form).await?.into_success()?;
        parse_assessment_report(&body, &sentence.text, self.api.base_url())
    }

    /// Practice sentences targeting `phonemes`; empty on any failure.
    pub async fn fetch_practice_sentences(&self, phonemes: &[String]) -> Vec<PracticeSentence> {
        if phonemes.is_empty() {
            return Vec::new();
        }
        match self.api.get(&practice_recommendation_path(phonemes)).await.and_then(Reply::into_success) {
            Ok(body) => parse_practice_sentences(&body),
            Err(e) => {
                log::warn!("practice recommendations unavailable: {e}");
                Vec::new()
            }
        }
    }

    /// Submit a practice recording for `sentence_id` and return its metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission fails.
    #[cfg(feature = "csr")]
    pub async fn submit_practice(&self, sentence_id: i64, audio: &web_sys::Blob) -> Result<SpeechMetrics, SpeechError> {
        let form = web_sys::FormData::new().map_err(form_error)?;
        form.append_with_blob_and_filename("audio", audio, "practice_audio.webm")
            .map_err(form_error)?;
        form.append_with_str("Sentence_id", &sentence_id.to_string()).map_err(form_error)?;
        let body = self.api.post_form(PRACTICE_SUBMIT_ENDPOINT, form).await?.into_success()?;
        Ok(parse_metrics(body.get("data").unwrap_or(&Value::Null)))
    }
}

#[cfg(feature = "csr")]
fn form_error(e: wasm_bindgen::JsValue) -> SpeechError {
    SpeechError::Transport(crate::error::TransportError(format!("could not build upload form: {e:?}")))
}

pub fn parse_sentence(body: &Value) -> Option<AssessmentSentence> {
    let text = body.get("text").and_then(Value::as_str).filter(|t| !t.is_empty())?;
    let id = ["sentence_id", "id"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_i64).filter(|id| *id != 0))
        .unwrap_or(1);
    let difficulty = body
        .get("difficulty")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .unwrap_or("easy");
    Some(AssessmentSentence { id, text: text.to_owned(), difficulty: difficulty.to_owned() })
}

/// Interpret an upload reply: a status code other than 201 is a rejection.
///
/// # Errors
///
/// Returns `SpeechError::Rejected` with the backend message (or "Upload failed").
pub fn parse_upload_reply(body: &Value) -> Result<SpeechMetrics, SpeechError> {
    let status = ["StatusCode", "statusCode"].iter().find_map(|key| body.get(key)).and_then(|v| {
        v.as_i64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    });
    if let Some(code) = status {
        if code != CREATED_STATUS {
            let message = body.get("message").and_then(Value::as_str).unwrap_or("Upload failed");
            return Err(SpeechError::Rejected(message.to_owned()));
        }
    }
    Ok(parse_metrics(body.get("data").unwrap_or(&Value::Null)))
}

/// Full report for an upload reply: headline metrics plus any breakdown.
///
/// # Errors
///
/// Returns `SpeechError::Rejected` under the same rule as `parse_upload_reply`.
pub fn parse_assessment_report(body: &Value, sentence: &str, api_base: &str) -> Result<AssessmentReport, SpeechError> {
    let metrics = parse_upload_reply(body)?;
    Ok(AssessmentReport { sentence: sentence.to_owned(), metrics, details: parse_detailed_results(body, api_base) })
}

/// KeyPath an upload reply for the per-phoneme and per-word breakdown.
///
/// Phoneme entries without a numeric accuracy are dropped. A relative
/// reference URL is resolved against `api_base`.
pub fn parse_detailed_results(body: &Value, api_base: &str) -> DetailedResults {
    let phonemes = first_array(body, PHONEME_LIST_PATHS)
        .map(|items| items.iter().filter_map(parse_phoneme).collect())
        .unwrap_or_default();
    let words = first_array(body, WORD_LIST_PATHS)
        .map(|items| items.iter().map(parse_word).collect())
        .unwrap_or_default();
    let overall_score = OVERALL_SCORE_PATHS
        .iter()
        .find_map(|path| lookup(body, path).and_then(Value::as_f64));
    let mistakes_summary = MISTAKES_SUMMARY_PATHS
        .iter()
        .find_map(|path| lookup(body, path).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(str::to_owned);
    let reference_audio_url = REFERENCE_AUDIO_PATHS
        .iter()
        .filter_map(|path| lookup(body, path).and_then(Value::as_str))
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(|url| resolve_reference_url(url, api_base));

    DetailedResults { overall_score, mistakes_summary, phonemes, words, reference_audio_url }
}

/// Absolute `http(s)` URLs pass through; others join the API host root.
///
/// The host root is `api_base` without a trailing `/api`. With no base the
/// URL is returned unchanged.
pub fn resolve_reference_url(url: &str, api_base: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return url.to_owned();
    }
    let host_root = strip_api_suffix(api_base);
    if host_root.is_empty() {
        return url.to_owned();
    }
    config::join_url(host_root, url)
}

fn strip_api_suffix(base: &str) -> &str {
    let trimmed = base.strip_suffix('/').unwrap_or(base);
    let Some(split) = trimmed.len().checked_sub(3) else {
        return base;
    };
    match (trimmed.get(..split), trimmed.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case("api") => head.strip_suffix('/').unwrap_or(head),
        _ => base,
    }
}

fn first_array<'a>(body: &'a Value, paths: &[KeyPath]) -> Option<&'a Vec<Value>> {
    paths.iter().find_map(|path| lookup(body, path).and_then(Value::as_array))
}

fn parse_phoneme(entry: &Value) -> Option<PhonemeResult> {
    let accuracy = PHONEME_ACCURACY_KEYS
        .iter()
        .find_map(|key| entry.get(key).and_then(Value::as_f64))?;
    let symbol = PHONEME_SYMBOL_KEYS
        .iter()
        .find_map(|key| entry.get(key).filter(|v| !v.is_null()))
        .map_or_else(|| "?".to_owned(), display_text);
    Some(PhonemeResult { symbol, accuracy })
}

fn parse_word(entry: &Value) -> WordResult {
    let text = WORD_TEXT_KEYS
        .iter()
        .find_map(|key| entry.get(key).filter(|v| !v.is_null()))
        .map(display_text)
        .unwrap_or_default();
    // An explicit `correct` wins; otherwise only `is_correct: false` marks a miss.
    let correct = match entry.get("correct") {
        Some(flag) => truthy(flag),
        None => entry.get("is_correct") != Some(&Value::Bool(false)),
    };
    WordResult { text, correct }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn parse_metrics(metrics: &Value) -> SpeechMetrics {
    let score = |key: &str| metrics.get(key).and_then(Value::as_f64);
    let weak_phonemes = ["weak_Phoneme", "computed_weak_phonemes"]
        .iter()
        .find_map(|key| metrics.get(key).and_then(Value::as_array))
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default();
    SpeechMetrics {
        fluency_score: score("fluency_score"),
        phoneme_accuracy: score("phoneme_accuracy"),
        word_accuracy: score("word_accuracy"),
        weak_phonemes,
    }
}

pub fn parse_practice_sentences(body: &Value) -> Vec<PracticeSentence> {
    let Some(rows) = body.get("recommendations").and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let text = row.get("text")?.as_str()?.to_owned();
            let sentence_id = row.get("sentence_id").and_then(Value::as_i64);
            Some(PracticeSentence { sentence_id, text })
        })
        .collect()
}

pub fn practice_recommendation_path(phonemes: &[String]) -> String {
    format!("{PRACTICE_RECOMMENDATION_ENDPOINT}?phonemes={}", phonemes.join(","))
}

/// Upload user id: session id, else the persisted `user_id`, else `"1"`.
pub fn resolve_upload_user_id(session_id: Option<&str>, stored_id: Option<&str>) -> String {
    let present = |id: &&str| !id.is_empty();
    session_id
        .filter(present)
        .or_else(|| stored_id.filter(present))
        .unwrap_or(DEFAULT_UPLOAD_USER_ID)
        .to_owned()
}

/// Keep the latest weak phonemes for the recommendation page.
pub fn remember_weak_phonemes(storage: &impl KeyValueStorage, phonemes: &[String]) {
    storage::save_json(storage, WEAK_PHONEMES_KEY, &phonemes);
}

/// Weak phonemes from the latest metrics, else from storage.
pub fn recall_weak_phonemes(latest: Option<&SpeechMetrics>, storage: &impl KeyValueStorage) -> Vec<String> {
    match latest {
        Some(metrics) if !metrics.weak_phonemes.is_empty() => metrics.weak_phonemes.clone(),
        _ => storage::load_json::<Vec<String>>(storage, WEAK_PHONEMES_KEY).unwrap_or_default(),
    }
}

/// Keep the whole report so a reload of the recommendation page can rebuild it.
pub fn remember_last_assessment(storage: &impl KeyValueStorage, report: &AssessmentReport) {
    storage::save_json(storage, LAST_ASSESSMENT_KEY, report);
}

pub fn recall_last_assessment(storage: &impl KeyValueStorage) -> Option<AssessmentReport> {
    storage::load_json(storage, LAST_ASSESSMENT_KEY)
}
