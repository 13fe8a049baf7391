//! Assessment page: read the sentence aloud, upload the recording, and see
//! the analysis.
//!
//! SYSTEM CONTEXT
//! ==============
//! The recording is a user-selected audio file. The upload carries the
//! session's user id and the sentence id. The resulting report is kept in
//! `AssessmentState` and, with its weak phonemes, in sessionStorage for the
//! recommendation page.

#[cfg(test)]
#[path = "assessment_test.rs"]
mod assessment_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::metrics_panel::{DetailedResultsPanel, MetricsPanel};
use crate::net::speech::{AssessmentSentence, SpeechApi};
use crate::state::assessment::AssessmentState;
use crate::state::auth::AuthState;
use crate::state::route::AppRoute;
use crate::util::auth::install_unauth_redirect;

/// Why an upload cannot start yet, if it cannot.
pub fn upload_blocked_reason(state: &AssessmentState, has_file: bool) -> Option<&'static str> {
    if state.uploading {
        Some("Please wait for the current upload to finish")
    } else if state.sentence.is_none() {
        Some("The sentence is still loading")
    } else if !has_file {
        Some("Choose an audio file first")
    } else {
        None
    }
}

#[component]
pub fn AssessmentPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let assessment = expect_context::<RwSignal<AssessmentState>>();
    let speech = expect_context::<SpeechApi>();
    install_unauth_redirect(auth, AppRoute::Assessment, use_navigate());

    let audio_ref = NodeRef::<leptos::html::Input>::new();

    #[cfg(feature = "csr")]
    {
        if assessment.get_untracked().sentence.is_none() {
            let speech = speech.clone();
            leptos::task::spawn_local(async move {
                let sentence = speech.fetch_assessment_sentence().await;
                assessment.try_update(|s| s.sentence = Some(sentence));
            });
        }
    }

    let on_upload = move |_| {
        #[cfg(feature = "csr")]
        {
            let file = audio_ref
                .get_untracked()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            let state = assessment.get_untracked();
            if let Some(reason) = upload_blocked_reason(&state, file.is_some()) {
                assessment.update(|s| s.message = Some(reason.to_owned()));
                return;
            }
            let (Some(file), Some(sentence)) = (file, state.sentence) else {
                return;
            };
            let user_id = crate::net::speech::resolve_upload_user_id(
                auth.get_untracked().user.as_ref().map(|u| u.id.as_str()),
                crate::util::storage::read(
                    &crate::util::storage::BrowserStorage::Local,
                    crate::util::storage::USER_ID_KEY,
                )
                .as_deref(),
            );
            assessment.update(AssessmentState::begin_upload);
            let speech = speech.clone();
            leptos::task::spawn_local(async move {
                let outcome = speech.upload_assessment(&user_id, &sentence, &file).await;
                match &outcome {
                    Ok(report) => {
                        let session = crate::util::storage::BrowserStorage::Session;
                        crate::net::speech::remember_weak_phonemes(&session, &report.metrics.weak_phonemes);
                        crate::net::speech::remember_last_assessment(&session, report);
                    }
                    Err(e) => log::warn!("assessment upload failed: {e}"),
                }
                assessment.try_update(|s| s.finish_upload(outcome));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&speech, audio_ref);
        }
    };

    view! {
        <div class="assessment-page">
            <A href=AppRoute::Dashboard.path()>"Back to dashboard"</A>
            <h1>"Speech assessment"</h1>
            {move || match assessment.get().sentence {
                Some(AssessmentSentence { text, difficulty, .. }) => view! {
                    <blockquote class="assessment-page__sentence">{text}</blockquote>
                    <p class="assessment-page__difficulty">"Difficulty: " {difficulty}</p>
                }
                .into_any(),
                None => view! { <p class="assessment-page__loading">"Loading sentence..."</p> }.into_any(),
            }}
            <div class="assessment-page__upload">
                <input type="file" accept="audio/*" node_ref=audio_ref/>
                <button on:click=on_upload disabled=move || assessment.get().uploading>
                    {move || if assessment.get().uploading { "Analyzing..." } else { "Upload recording" }}
                </button>
            </div>
            {move || assessment.get().message.map(|m| view! { <p class="assessment-page__message">{m}</p> })}
            {move || {
                assessment
                    .get()
                    .report
                    .map(|report| {
                        let details = (!report.details.is_empty()).then(|| {
                            view! { <DetailedResultsPanel details=report.details/> }
                        });
                        view! {
                            <MetricsPanel metrics=report.metrics/>
                            {details}
                            <A href=AppRoute::Recommendations.path()>"See practice recommendations"</A>
                        }
                    })
            }}
        </div>
    }
}
