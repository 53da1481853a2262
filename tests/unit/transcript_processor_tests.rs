/*!
 * Tests for transcript segmentation
 */

use anyhow::Result;
use filchat::app_config::SegmentationConfig;
use filchat::transcript_processor::{Exchange, Transcript};
use crate::common;

fn markers() -> SegmentationConfig {
    SegmentationConfig::default()
}

/// Test that a transcript with two full exchanges yields both, in order
#[test]
fn test_parse_transcript_string_withTwoExchanges_shouldReturnBothInOrder() {
    let content = "\
Vous avez dit :
Q1
ChatGPT a dit :
A1
Vous avez dit :
Q2
ChatGPT a dit :
A2
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 2);
    assert_eq!(exchanges[0], Exchange::new(1, "Q1".to_string(), "A1".to_string()));
    assert_eq!(exchanges[1], Exchange::new(2, "Q2".to_string(), "A2".to_string()));
}

/// Test that a transcript without any marker yields no exchanges
#[test]
fn test_parse_transcript_string_withNoMarkers_shouldReturnEmpty() {
    let content = "just some text\nwith a few lines\nand no markers\n";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert!(exchanges.is_empty());
}

/// Test that an empty input yields no exchanges
#[test]
fn test_parse_transcript_string_withEmptyInput_shouldReturnEmpty() {
    let exchanges = Transcript::parse_transcript_string("", &markers());

    assert!(exchanges.is_empty());
}

/// Test that an answer running to the end of the file is still flushed
#[test]
fn test_parse_transcript_string_withAnswerRunningToEndOfFile_shouldKeepTrailingExchange() {
    let content = "\
Vous avez dit :
Q
ChatGPT a dit :
A line 1
A line 2";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "Q");
    assert_eq!(exchanges[0].answer, "A line 1\nA line 2");
}

/// Test that marker detection is substring containment, not a full-line match
#[test]
fn test_parse_transcript_string_withMarkerInsideLine_shouldStartNewExchange() {
    let content = "\
prologue to ignore
-- Vous avez dit : --
Q
> ChatGPT a dit :
A
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "Q");
    assert_eq!(exchanges[0].answer, "A");
}

/// Test that lines before the first question marker are discarded
#[test]
fn test_parse_transcript_string_withLinesBeforeFirstMarker_shouldDiscardThem() {
    let content = "\
exported on 2025-01-01
some preamble
Vous avez dit :
Q
ChatGPT a dit :
A
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "Q");
}

/// Test that an answer marker arriving before any question is ignored
#[test]
fn test_parse_transcript_string_withAnswerMarkerFirst_shouldIgnoreUnopenedAnswer() {
    let content = "\
ChatGPT a dit :
orphan answer text
Vous avez dit :
Q
ChatGPT a dit :
A
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "Q");
    assert_eq!(exchanges[0].answer, "A");
}

/// Test that two question markers in a row emit the first exchange with an
/// empty answer rather than dropping it
#[test]
fn test_parse_transcript_string_withConsecutiveQuestionMarkers_shouldEmitEmptyAnswerExchange() {
    let content = "\
Vous avez dit :
Q1
Vous avez dit :
Q2
ChatGPT a dit :
A2
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 2);
    assert_eq!(exchanges[0].question, "Q1");
    assert_eq!(exchanges[0].answer, "");
    assert_eq!(exchanges[1].question, "Q2");
    assert_eq!(exchanges[1].answer, "A2");
}

/// Test that interior blank lines survive while edge whitespace is trimmed
#[test]
fn test_parse_transcript_string_withBlankInteriorLines_shouldPreserveThemAndTrimEdges() {
    let content = "\
Vous avez dit :

first paragraph

second paragraph

ChatGPT a dit :
A
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "first paragraph\n\nsecond paragraph");
}

/// Test that a repeated answer marker keeps accumulating the same answer
#[test]
fn test_parse_transcript_string_withRepeatedAnswerMarker_shouldContinueSameAnswer() {
    let content = "\
Vous avez dit :
Q
ChatGPT a dit :
A1
ChatGPT a dit :
A2
";

    let exchanges = Transcript::parse_transcript_string(content, &markers());

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].answer, "A1\nA2");
}

/// Test that custom markers from the configuration are honoured
#[test]
fn test_parse_transcript_string_withCustomMarkers_shouldUseThem() {
    let custom = SegmentationConfig {
        question_marker: "User:".to_string(),
        answer_marker: "Bot:".to_string(),
    };
    let content = "User:\nhello\nBot:\nhi there\n";

    let exchanges = Transcript::parse_transcript_string(content, &custom);

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].question, "hello");
    assert_eq!(exchanges[0].answer, "hi there");
}

/// Test that exchange indices are sequential starting at 1
#[test]
fn test_parse_transcript_string_withThreeExchanges_shouldNumberThemFromOne() {
    let mut content = String::new();
    for i in 1..=3 {
        content.push_str(&format!("Vous avez dit :\nQ{}\nChatGPT a dit :\nA{}\n", i, i));
    }

    let exchanges = Transcript::parse_transcript_string(&content, &markers());

    let indices: Vec<usize> = exchanges.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

/// Test that parse_file reads and segments an actual file
#[test]
fn test_parse_file_withValidFile_shouldSegmentIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_transcript(&temp_dir.path().to_path_buf(), "sample.txt")?;

    let transcript = Transcript::parse_file(&file, &markers())?;

    assert_eq!(transcript.source_file, file);
    assert_eq!(transcript.exchanges.len(), 2);
    assert_eq!(transcript.exchanges[0].question, "Peux-tu m'expliquer le bitume ?");
    assert_eq!(transcript.exchanges[1].answer, "Avec plaisir.");
    Ok(())
}

/// Test that parse_file reports missing files as errors
#[test]
fn test_parse_file_withMissingFile_shouldReturnError() {
    let result = Transcript::parse_file("definitely/not/here.txt", &markers());

    assert!(result.is_err());
}

/// Test the Display rendering of a single exchange
#[test]
fn test_exchange_display_shouldRenderQuestionAndAnswerHeadings() {
    let exchange = Exchange::new(1, "Q".to_string(), "A".to_string());

    let rendered = format!("{}", exchange);

    assert_eq!(rendered, "# Question\nQ\n\n# Réponse\nA\n");
}
