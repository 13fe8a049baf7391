//! Practice recommendations built from the last assessment, with scoring for
//! a practice recording.
//!
//! The last report comes from `AssessmentState`, or from sessionStorage after
//! a reload. Its weak phonemes drive the practice-sentence request; its
//! breakdown lists the sounds and words to focus on.

#[cfg(test)]
#[path = "recommendations_test.rs"]
mod recommendations_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::metrics_panel::{MetricsPanel, format_score, weak_phoneme_summary};
use crate::net::speech::{
    AssessmentReport, PracticeSentence, SpeechApi, SpeechMetrics, recall_last_assessment, recall_weak_phonemes,
};
use crate::state::assessment::AssessmentState;
use crate::state::auth::AuthState;
use crate::state::route::AppRoute;
use crate::util::auth::install_unauth_redirect;
use crate::util::storage::BrowserStorage;

/// Backend id of the chosen practice sentence, if it has one.
pub fn practice_sentence_id(sentences: &[PracticeSentence], chosen: Option<usize>) -> Option<i64> {
    chosen.and_then(|index| sentences.get(index)).and_then(|s| s.sentence_id)
}

/// Last assessment recap: its sentence, the phonemes under the practice
/// threshold (weakest first), and the words read incorrectly.
fn practice_focus(report: AssessmentReport) -> impl IntoView {
    let phoneme_items = report
        .details
        .phonemes_to_practice()
        .into_iter()
        .map(|p| {
            let accuracy = format_score(Some(p.accuracy));
            view! { <li>{p.symbol.clone()} " " {accuracy}</li> }
        })
        .collect_view();
    let word_items = report
        .details
        .words_to_practice()
        .into_iter()
        .map(|w| view! { <li>{w.text.clone()}</li> })
        .collect_view();

    view! {
        <section class="recommendations-page__recap">
            <h2>"Your last assessment"</h2>
            <blockquote>{report.sentence}</blockquote>
            <MetricsPanel metrics=report.metrics/>
            <h3>"Phonemes to practice"</h3>
            <ul class="recommendations-page__focus-phonemes">{phoneme_items}</ul>
            <h3>"Words to practice"</h3>
            <ul class="recommendations-page__focus-words">{word_items}</ul>
        </section>
    }
}

#[component]
pub fn RecommendationsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let assessment = expect_context::<RwSignal<AssessmentState>>();
    let speech = expect_context::<SpeechApi>();
    install_unauth_redirect(auth, AppRoute::Recommendations, use_navigate());

    let report = assessment
        .get_untracked()
        .report
        .or_else(|| recall_last_assessment(&BrowserStorage::Session));
    let phonemes = recall_weak_phonemes(report.as_ref().map(|r| &r.metrics), &BrowserStorage::Session);
    let focus = report.map(practice_focus);
    let summary = weak_phoneme_summary(&phonemes);
    let has_phonemes = !phonemes.is_empty();

    // None while loading.
    let sentences = RwSignal::new(None::<Vec<PracticeSentence>>);
    let chosen = RwSignal::new(None::<usize>);
    let result = RwSignal::new(None::<SpeechMetrics>);
    let submitting = RwSignal::new(false);
    let message = RwSignal::new(None::<String>);
    let audio_ref = NodeRef::<leptos::html::Input>::new();

    #[cfg(feature = "csr")]
    {
        let speech = speech.clone();
        leptos::task::spawn_local(async move {
            let rows = speech.fetch_practice_sentences(&phonemes).await;
            sentences.try_set(Some(rows));
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        sentences.set(Some(Vec::new()));
    }

    let on_submit = move |_| {
        if submitting.get_untracked() {
            return;
        }
        let rows = sentences.get_untracked().unwrap_or_default();
        let Some(sentence_id) = practice_sentence_id(&rows, chosen.get_untracked()) else {
            message.set(Some("Choose a practice sentence first".to_owned()));
            return;
        };
        #[cfg(feature = "csr")]
        {
            let Some(file) = audio_ref
                .get_untracked()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0))
            else {
                message.set(Some("Choose an audio file first".to_owned()));
                return;
            };
            submitting.set(true);
            message.set(None);
            let speech = speech.clone();
            leptos::task::spawn_local(async move {
                match speech.submit_practice(sentence_id, &file).await {
                    Ok(metrics) => {
                        result.try_set(Some(metrics));
                    }
                    Err(e) => {
                        log::warn!("practice submission failed: {e}");
                        message.try_set(Some(format!("Submission failed: {e}")));
                    }
                }
                submitting.try_set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (sentence_id, &speech, audio_ref, result);
        }
    };

    view! {
        <div class="recommendations-page">
            <A href=AppRoute::Assessment.path()>"Back to assessment"</A>
            <h1>"Practice recommendations"</h1>
            <p class="recommendations-page__phonemes">"Focus sounds: " {summary}</p>
            {focus}
            {(!has_phonemes).then(|| view! { <p>"Complete an assessment to get personalized practice."</p> })}
            {has_phonemes.then(|| view! {
                {move || match sentences.get() {
                    None => view! { <p>"Loading practice sentences..."</p> }.into_any(),
                    Some(rows) if rows.is_empty() => view! { <p>"No practice sentences available right now."</p> }.into_any(),
                    Some(rows) => view! {
                        <ul class="recommendations-page__list">
                            {rows
                                .into_iter()
                                .enumerate()
                                .map(|(index, row)| {
                                    view! {
                                        <li
                                            class="recommendations-page__item"
                                            class:recommendations-page__item--chosen=move || chosen.get() == Some(index)
                                            on:click=move |_| chosen.set(Some(index))
                                        >
                                            {row.text}
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                    .into_any(),
                }}
                <div class="recommendations-page__submit">
                    <input type="file" accept="audio/*" node_ref=audio_ref/>
                    <button on:click=on_submit disabled=move || submitting.get()>
                        {move || if submitting.get() { "Scoring..." } else { "Submit practice" }}
                    </button>
                </div>
            })}
            {move || message.get().map(|m| view! { <p class="recommendations-page__message">{m}</p> })}
            {move || result.get().map(|metrics| view! { <MetricsPanel metrics/> })}
        </div>
    }
}
