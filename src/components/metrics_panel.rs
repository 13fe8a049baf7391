//! Score summary for an assessment or practice recording, and the optional
//! per-phoneme and per-word breakdown of an assessment.

#[cfg(test)]
#[path = "metrics_panel_test.rs"]
mod metrics_panel_test;

use leptos::prelude::*;

use crate::net::speech::{DetailedResults, SpeechMetrics};

/// One decimal place, or `"n/a"` when the backend omitted the score.
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_owned(), |value| format!("{value:.1}"))
}

pub fn weak_phoneme_summary(phonemes: &[String]) -> String {
    if phonemes.is_empty() {
        "No weak phonemes detected".to_owned()
    } else {
        phonemes.join(", ")
    }
}

#[component]
pub fn MetricsPanel(metrics: SpeechMetrics) -> impl IntoView {
    let rows = [
        ("Fluency", format_score(metrics.fluency_score)),
        ("Phoneme accuracy", format_score(metrics.phoneme_accuracy)),
        ("Word accuracy", format_score(metrics.word_accuracy)),
    ];
    let weak = weak_phoneme_summary(&metrics.weak_phonemes);

    view! {
        <div class="metrics-panel">
            <dl class="metrics-panel__scores">
                {rows
                    .into_iter()
                    .map(|(label, value)| {
                        view! {
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        }
                    })
                    .collect_view()}
            </dl>
            <p class="metrics-panel__weak">"Weak phonemes: " {weak}</p>
        </div>
    }
}

/// Word list marks, `"✓"` for a word read correctly and `"✗"` otherwise.
pub fn word_mark(correct: bool) -> &'static str {
    if correct { "✓" } else { "✗" }
}

#[component]
pub fn DetailedResultsPanel(details: DetailedResults) -> impl IntoView {
    let DetailedResults { overall_score, mistakes_summary, phonemes, words, reference_audio_url } = details;

    let phoneme_rows = phonemes
        .into_iter()
        .map(|phoneme| {
            let weak = phoneme.needs_practice();
            let accuracy = format_score(Some(phoneme.accuracy));
            view! {
                <li class="detailed-results__phoneme" class:detailed-results__phoneme--weak=weak>
                    <span class="detailed-results__symbol">{phoneme.symbol}</span>
                    <span class="detailed-results__accuracy">{accuracy}</span>
                </li>
            }
        })
        .collect_view();
    let word_marks = words
        .into_iter()
        .map(|word| {
            let missed = !word.correct;
            let mark = word_mark(word.correct);
            view! {
                <span class="detailed-results__word" class:detailed-results__word--missed=missed>
                    {word.text} " " {mark}
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="detailed-results">
            {overall_score.map(|score| {
                view! { <p class="detailed-results__overall">"Overall score: " {format_score(Some(score))}</p> }
            })}
            {mistakes_summary.map(|summary| view! { <p class="detailed-results__summary">{summary}</p> })}
            <ul class="detailed-results__phonemes">{phoneme_rows}</ul>
            <p class="detailed-results__words">{word_marks}</p>
            {reference_audio_url.map(|src| {
                view! {
                    <div class="detailed-results__reference">
                        <span>"Reference pronunciation"</span>
                        <audio controls=true src=src></audio>
                    </div>
                }
            })}
        </div>
    }
}
