use super::*;

// ===== chat completions =====

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Hello!" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "Hello!"));
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_length_maps_to_max_tokens() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "truncated out" },
            "finish_reason": "length"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
}

#[test]
fn cc_parse_null_content_is_empty() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": null },
            "finish_reason": "stop"
        }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o", "choices": [] }).to_string();
    let err = parse_chat_completions_response(&json).unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(msg) if msg.contains("choices")));
}

#[test]
fn cc_parse_invalid_json() {
    assert!(matches!(parse_chat_completions_response("nope"), Err(LlmError::ApiParse(_))));
}

// ===== responses API =====

#[test]
fn resp_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [{
            "type": "message",
            "content": [{ "type": "output_text", "text": "Done!" }]
        }],
        "usage": { "input_tokens": 15, "output_tokens": 8 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "Done!"));
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 15);
}

#[test]
fn resp_parse_skips_non_message_items() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [
            { "type": "reasoning", "summary": [] },
            { "type": "message", "content": [{ "type": "output_text", "text": "kept" }] }
        ],
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "kept"));
}

#[test]
fn resp_parse_output_text_fallback() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output_text": "Fallback text",
        "usage": { "input_tokens": 5, "output_tokens": 3 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "Fallback text"));
}

#[test]
fn resp_parse_incomplete_maps_to_max_tokens() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [{
            "type": "message",
            "content": [{ "type": "output_text", "text": "partial" }]
        }],
        "incomplete_details": { "reason": "max_output_tokens" },
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
}

// ===== request builders =====

#[test]
fn cc_messages_include_system_first() {
    let messages = [Message::user("fix this"), Message::assistant("done")];
    let out = build_chat_completions_messages("be terse", &messages);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].role, "system");
    assert_eq!(out[0].content, "be terse");
    assert_eq!(out[1].role, "user");
    assert_eq!(out[2].role, "assistant");
}

#[test]
fn cc_messages_skip_blank_system_and_empty_content() {
    let messages = [Message::user(""), Message::user("real")];
    let out = build_chat_completions_messages("  ", &messages);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].content, "real");
}

#[test]
fn responses_input_carries_roles_and_skips_empty() {
    let messages = [Message::user("fix this"), Message::user("")];
    let input = build_responses_input(&messages);
    assert_eq!(input.len(), 1);
    let RespInputItem::Message { role, content } = &input[0];
    assert_eq!(role, "user");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].text, "fix this");
}

#[test]
fn flatten_joins_text_blocks_only() {
    let content = Content::Blocks(vec![
        ContentBlock::Text { text: "a".into() },
        ContentBlock::Thinking { thinking: "hmm".into() },
        ContentBlock::Text { text: "b".into() },
    ]);
    assert_eq!(flatten_content(&content), "ab");
}

#[test]
fn client_trims_trailing_slash() {
    let client = OpenAiClient::new(
        "key".into(),
        OpenAiApiMode::Responses,
        "https://example.test/v1/".into(),
        LlmTimeouts::default(),
    )
    .unwrap();
    assert_eq!(client.base_url, "https://example.test/v1");
}
