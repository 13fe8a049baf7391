use super::*;
use crate::util::storage::MemoryStorage;
use serde_json::json;

#[test]
fn parse_sentence_reads_text_id_and_difficulty() {
    let body = json!({ "text": "She sells sea shells.", "sentence_id": 12, "difficulty": "hard" });
    assert_eq!(
        parse_sentence(&body),
        Some(AssessmentSentence { id: 12, text: "She sells sea shells.".to_owned(), difficulty: "hard".to_owned() })
    );
}

#[test]
fn parse_sentence_defaults_id_and_difficulty() {
    let sentence = parse_sentence(&json!({ "text": "Red lorry." })).unwrap();
    assert_eq!(sentence.id, 1);
    assert_eq!(sentence.difficulty, "easy");
    assert_eq!(parse_sentence(&json!({ "text": "x", "id": 5 })).unwrap().id, 5);
}

#[test]
fn parse_sentence_requires_text() {
    assert_eq!(parse_sentence(&json!({ "sentence_id": 3 })), None);
    assert_eq!(parse_sentence(&json!({ "text": "" })), None);
}

#[test]
fn parse_upload_reply_accepts_created_status() {
    let body = json!({
        "StatusCode": 201,
        "data": { "fluency_score": 80.5, "phoneme_accuracy": 71, "word_accuracy": 90, "weak_Phoneme": ["th", "r"] }
    });
    assert_eq!(
        parse_upload_reply(&body),
        Ok(SpeechMetrics {
            fluency_score: Some(80.5),
            phoneme_accuracy: Some(71.0),
            word_accuracy: Some(90.0),
            weak_phonemes: vec!["th".to_owned(), "r".to_owned()],
        })
    );
}

#[test]
fn parse_upload_reply_without_status_is_accepted() {
    let metrics = parse_upload_reply(&json!({ "data": { "word_accuracy": 50 } })).unwrap();
    assert_eq!(metrics.word_accuracy, Some(50.0));
    assert!(metrics.weak_phonemes.is_empty());
}

#[test]
fn parse_upload_reply_rejects_other_status() {
    let body = json!({ "statusCode": "400", "message": "audio too short" });
    assert_eq!(parse_upload_reply(&body), Err(SpeechError::Rejected("audio too short".to_owned())));
    let bare = json!({ "StatusCode": 500 });
    assert_eq!(parse_upload_reply(&bare), Err(SpeechError::Rejected("Upload failed".to_owned())));
}

#[test]
fn parse_metrics_reads_practice_weak_phonemes() {
    let metrics = parse_metrics(&json!({ "computed_weak_phonemes": ["s"] }));
    assert_eq!(metrics.weak_phonemes, vec!["s".to_owned()]);
}

#[test]
fn parse_practice_sentences_skips_rows_without_text() {
    let body = json!({ "recommendations": [
        { "text": "Thin thread.", "sentence_id": 4 },
        { "sentence_id": 5 },
        { "text": "Three trees." }
    ] });
    assert_eq!(
        parse_practice_sentences(&body),
        vec![
            PracticeSentence { sentence_id: Some(4), text: "Thin thread.".to_owned() },
            PracticeSentence { sentence_id: None, text: "Three trees.".to_owned() },
        ]
    );
    assert!(parse_practice_sentences(&json!({})).is_empty());
}

#[test]
fn practice_recommendation_path_joins_phonemes() {
    let path = practice_recommendation_path(&["th".to_owned(), "r".to_owned()]);
    assert_eq!(path, "/practice/recommendation?phonemes=th,r");
}

#[test]
fn resolve_upload_user_id_prefers_session_then_storage() {
    assert_eq!(resolve_upload_user_id(Some("7"), Some("9")), "7");
    assert_eq!(resolve_upload_user_id(None, Some("9")), "9");
    assert_eq!(resolve_upload_user_id(Some(""), None), "1");
    assert_eq!(resolve_upload_user_id(None, None), "1");
}

#[test]
fn weak_phonemes_prefer_latest_metrics_then_storage() {
    let storage = MemoryStorage::new();
    remember_weak_phonemes(&storage, &["sh".to_owned()]);

    let latest = SpeechMetrics { weak_phonemes: vec!["k".to_owned()], ..SpeechMetrics::default() };
    assert_eq!(recall_weak_phonemes(Some(&latest), &storage), vec!["k".to_owned()]);
    assert_eq!(recall_weak_phonemes(Some(&SpeechMetrics::default()), &storage), vec!["sh".to_owned()]);
    assert_eq!(recall_weak_phonemes(None, &MemoryStorage::new()), Vec::<String>::new());
}

#[cfg(not(feature = "csr"))]
#[test]
fn fetch_assessment_sentence_falls_back_when_unreachable() {
    let api = SpeechApi::from_config(&ClientConfig::from_values(Some("http://h"), None, None, false));
    let sentence = futures::executor::block_on(api.fetch_assessment_sentence());
    assert_eq!(sentence, fallback_sentence());
    let practice = futures::executor::block_on(api.fetch_practice_sentences(&["th".to_owned()]));
    assert!(practice.is_empty());
}

// =============================================================
// detailed results
// =============================================================

const API_BASE: &str = "http://127.0.0.1:5000/api";

fn phoneme(symbol: &str, accuracy: f64) -> PhonemeResult {
    PhonemeResult { symbol: symbol.to_owned(), accuracy }
}

fn word(text: &str, correct: bool) -> WordResult {
    WordResult { text: text.to_owned(), correct }
}

#[test]
fn detailed_phonemes_read_each_list_key() {
    for body in [
        json!({ "data": { "phonemes": [{ "symbol": "/r/", "accuracy": 60 }] } }),
        json!({ "data": { "phoneme_results": [{ "symbol": "/r/", "accuracy": 60 }] } }),
        json!({ "phonemes": [{ "symbol": "/r/", "accuracy": 60 }] }),
        json!({ "phoneme_results": [{ "symbol": "/r/", "accuracy": 60 }] }),
    ] {
        assert_eq!(parse_detailed_results(&body, API_BASE).phonemes, vec![phoneme("/r/", 60.0)], "body: {body}");
    }
}

#[test]
fn detailed_phonemes_prefer_data_over_root() {
    let body = json!({
        "data": { "phonemes": [{ "symbol": "a", "accuracy": 1 }] },
        "phonemes": [{ "symbol": "b", "accuracy": 2 }]
    });
    assert_eq!(parse_detailed_results(&body, API_BASE).phonemes, vec![phoneme("a", 1.0)]);
}

#[test]
fn detailed_phoneme_fields_fall_back_and_drop_unscored() {
    let body = json!({ "phonemes": [
        { "phoneme": "/θ/", "score": 72.5 },
        { "phone": "k", "accuracy": 90, "score": 10 },
        { "accuracy": 50 },
        { "symbol": 7, "accuracy": 40 },
        { "symbol": "/s/", "accuracy": "high", "score": 55 },
        { "symbol": "/z/" },
        { "symbol": "/ʃ/", "accuracy": "n/a" }
    ] });
    assert_eq!(
        parse_detailed_results(&body, API_BASE).phonemes,
        vec![phoneme("/θ/", 72.5), phoneme("k", 90.0), phoneme("?", 50.0), phoneme("7", 40.0), phoneme("/s/", 55.0)]
    );
}

#[test]
fn detailed_words_read_text_and_correctness() {
    let body = json!({ "data": { "word_results": [
        { "text": "The", "correct": true },
        { "word": "quick", "is_correct": false },
        { "word": "brown" },
        { "text": "fox", "correct": false, "is_correct": true },
        { "text": "jumps", "correct": null },
        { "text": "over", "correct": 1 },
        {}
    ] } });
    assert_eq!(
        parse_detailed_results(&body, API_BASE).words,
        vec![
            word("The", true),
            word("quick", false),
            word("brown", true),
            word("fox", false),
            word("jumps", false),
            word("over", true),
            word("", true),
        ]
    );
}

#[test]
fn detailed_words_read_root_words_key() {
    let body = json!({ "words": [{ "text": "dog.", "is_correct": false }] });
    assert_eq!(parse_detailed_results(&body, API_BASE).words, vec![word("dog.", false)]);
}

#[test]
fn detailed_overall_score_fallbacks() {
    let score = |body: Value| parse_detailed_results(&body, API_BASE).overall_score;
    assert_eq!(score(json!({ "data": { "overall_score": 81 } })), Some(81.0));
    assert_eq!(score(json!({ "data": { "sentence_score": 64.5 } })), Some(64.5));
    assert_eq!(score(json!({ "overall_score": 70 })), Some(70.0));
    assert_eq!(score(json!({ "data": { "overall_score": 90 }, "overall_score": 10 })), Some(90.0));
    assert_eq!(score(json!({ "data": { "overall_score": "high" } })), None);
    assert_eq!(score(json!({ "sentence_score": 50 })), None);
}

#[test]
fn detailed_mistakes_summary_fallbacks() {
    let summary = |body: Value| parse_detailed_results(&body, API_BASE).mistakes_summary;
    assert_eq!(summary(json!({ "data": { "mistakes_summary": "Short vowels." } })).as_deref(), Some("Short vowels."));
    assert_eq!(summary(json!({ "mistakes_summary": "Dropped final /g/." })).as_deref(), Some("Dropped final /g/."));
    assert_eq!(summary(json!({ "summary": "Good pace." })).as_deref(), Some("Good pace."));
    assert_eq!(summary(json!({ "data": {} })), None);
}

#[test]
fn detailed_reference_audio_reads_every_candidate_key() {
    for key in ["reference_audio_url", "referenceAudioUrl", "reference_audio", "reference_url", "reference"] {
        let nested = json!({ "data": { key: "https://cdn.test/ref.wav" } });
        let root = json!({ key: "https://cdn.test/ref.wav" });
        for body in [nested, root] {
            assert_eq!(
                parse_detailed_results(&body, API_BASE).reference_audio_url.as_deref(),
                Some("https://cdn.test/ref.wav"),
                "body: {body}"
            );
        }
    }
}

#[test]
fn detailed_reference_audio_skips_blank_and_non_text_candidates() {
    let body = json!({
        "data": { "reference_audio_url": "   ", "referenceAudioUrl": 12 },
        "reference": "  https://cdn.test/late.wav  "
    });
    assert_eq!(
        parse_detailed_results(&body, API_BASE).reference_audio_url.as_deref(),
        Some("https://cdn.test/late.wav")
    );
    assert_eq!(parse_detailed_results(&json!({}), API_BASE).reference_audio_url, None);
}

#[test]
fn detailed_reference_audio_resolves_relative_path() {
    let body = json!({ "data": { "reference_audio": "/media/ref.wav" } });
    assert_eq!(
        parse_detailed_results(&body, API_BASE).reference_audio_url.as_deref(),
        Some("http://127.0.0.1:5000/media/ref.wav")
    );
}

#[test]
fn resolve_reference_url_keeps_absolute_urls() {
    assert_eq!(resolve_reference_url("https://cdn.test/a.wav", API_BASE), "https://cdn.test/a.wav");
    assert_eq!(resolve_reference_url("HTTP://cdn.test/a.wav", API_BASE), "HTTP://cdn.test/a.wav");
}

#[test]
fn resolve_reference_url_joins_host_root() {
    assert_eq!(resolve_reference_url("media/a.wav", "http://h/api"), "http://h/media/a.wav");
    assert_eq!(resolve_reference_url("/media/a.wav", "http://h/API/"), "http://h/media/a.wav");
    assert_eq!(resolve_reference_url("/media/a.wav", "http://h"), "http://h/media/a.wav");
    assert_eq!(resolve_reference_url("/media/a.wav", "http://h/v1"), "http://h/v1/media/a.wav");
}

#[test]
fn resolve_reference_url_without_base_is_unchanged() {
    assert_eq!(resolve_reference_url("media/a.wav", ""), "media/a.wav");
    assert_eq!(resolve_reference_url("/media/a.wav", "/api"), "/media/a.wav");
}

#[test]
fn detailed_results_empty_without_breakdown() {
    assert!(parse_detailed_results(&json!({ "data": { "fluency_score": 80 } }), API_BASE).is_empty());
}

#[test]
fn parse_assessment_report_combines_metrics_and_details() {
    let body = json!({
        "StatusCode": 201,
        "data": { "fluency_score": 75, "weak_Phoneme": ["r"], "phonemes": [{ "symbol": "/r/", "accuracy": 60 }] }
    });
    let report = parse_assessment_report(&body, "Red lorry.", API_BASE).unwrap();
    assert_eq!(report.sentence, "Red lorry.");
    assert_eq!(report.metrics.weak_phonemes, vec!["r".to_owned()]);
    assert_eq!(report.details.phonemes, vec![phoneme("/r/", 60.0)]);

    let rejected = json!({ "StatusCode": 400, "message": "too quiet" });
    assert_eq!(
        parse_assessment_report(&rejected, "x", API_BASE),
        Err(SpeechError::Rejected("too quiet".to_owned()))
    );
}

#[test]
fn practice_focus_sorts_weak_phonemes_and_limits_words() {
    let details = DetailedResults {
        phonemes: vec![phoneme("/ð/", 78.0), phoneme("/k/", 90.0), phoneme("/r/", 60.0), phoneme("/b/", 80.0)],
        words: (0..25).map(|i| word(&format!("w{i}"), i % 5 == 0)).collect(),
        ..DetailedResults::default()
    };
    let weak: Vec<&str> = details.phonemes_to_practice().iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(weak, vec!["/r/", "/ð/"]);

    let missed = details.words_to_practice();
    assert_eq!(missed.len(), 20);
    assert!(missed.iter().all(|w| !w.correct));
    assert_eq!(missed[0].text, "w1");
}

#[test]
fn last_assessment_survives_reload() {
    let storage = MemoryStorage::new();
    let report = AssessmentReport {
        sentence: "The quick brown fox.".to_owned(),
        metrics: SpeechMetrics { fluency_score: Some(88.0), weak_phonemes: vec!["th".to_owned()], ..SpeechMetrics::default() },
        details: DetailedResults {
            overall_score: Some(81.0),
            words: vec![word("quick", false)],
            reference_audio_url: Some("http://h/media/ref.wav".to_owned()),
            ..DetailedResults::default()
        },
    };
    remember_last_assessment(&storage, &report);

    let reloaded = storage.clone();
    assert_eq!(recall_last_assessment(&reloaded), Some(report));
}

#[test]
fn last_assessment_missing_or_malformed_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(recall_last_assessment(&storage), None);
    storage::write(&storage, LAST_ASSESSMENT_KEY, "{broken");
    assert_eq!(recall_last_assessment(&storage), None);
    assert_eq!(recall_last_assessment(&MemoryStorage::unavailable()), None);
}
