//! Mapping between internal conversation types and the wire schema.

use serde_json::Value;

use super::error::LLMError;
use super::types::{
    ChatMessage, ChatRequestOptions, CompletionDetail, LastContext, Role, WireMessage,
    WireRequest, WireResponse,
};

/// Build the outgoing request for one conversation turn.
///
/// Produces an optional system turn followed by exactly one user turn. The
/// `last_context` fields are merged into the final message.
pub fn to_wire_request(options: &ChatRequestOptions, model: &str) -> WireRequest {
    let mut messages = Vec::with_capacity(2);

    if let Some(system) = options.system_message.as_deref()
        && !system.is_empty()
    {
        messages.push(WireMessage::new(Role::System, system));
    }
    messages.push(WireMessage::new(Role::User, options.message.as_str()));

    if let Some(ref context) = options.last_context
        && let Some(last) = messages.last_mut()
    {
        merge_context(last, context);
    }

    WireRequest {
        messages,
        model: model.to_string(),
        temperature: options.temperature,
        top_p: options.top_p,
    }
}

/// Shallow-merge `context` over `message`; context keys win.
///
/// A `role` or `content` key that does not fit the message type is dropped.
fn merge_context(message: &mut WireMessage, context: &LastContext) {
    let Ok(Value::Object(fields)) = serde_json::to_value(context) else {
        return;
    };

    for (key, value) in fields {
        match key.as_str() {
            "role" => {
                if let Ok(role) = serde_json::from_value::<Role>(value) {
                    message.role = role;
                }
            }
            "content" => {
                if let Value::String(content) = value {
                    message.content = content;
                }
            }
            _ => {
                message.extra.insert(key, value);
            }
        }
    }
}

/// Convert a provider response into the internal message shape.
///
/// Only the first choice is used. The conversation id is synthesized from the
/// response id.
pub fn from_wire_response(response: WireResponse) -> Result<ChatMessage, LLMError> {
    let WireResponse {
        id,
        created,
        model,
        choices,
    } = response;

    let Some(choice) = choices.into_iter().next() else {
        return Err(LLMError::MalformedResponse(
            "response contains no choices".to_string(),
        ));
    };
    let Some(reply) = choice.message else {
        return Err(LLMError::MalformedResponse(
            "first choice has no message".to_string(),
        ));
    };

    Ok(ChatMessage {
        text: reply.content.unwrap_or_default(),
        role: reply.role,
        parent_message_id: id.clone(),
        conversation_id: format!("{id}-conv"),
        id,
        detail: CompletionDetail {
            finish_reason: choice.finish_reason,
            created,
            model,
            index: choice.index,
        },
    })
}

/// Decode a raw response body and convert it.
pub fn parse_wire_response(body: &str) -> Result<ChatMessage, LLMError> {
    let response: WireResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::MalformedResponse(format!("invalid response body: {e}")))?;
    from_wire_response(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(conversation_id: &str, parent_message_id: &str) -> LastContext {
        LastContext {
            conversation_id: Some(conversation_id.to_string()),
            parent_message_id: Some(parent_message_id.to_string()),
            ..LastContext::default()
        }
    }

    fn fixture() -> WireResponse {
        serde_json::from_value(json!({
            "id": "r1",
            "created": 1,
            "model": "gpt-4o",
            "choices": [
                {"index": 0, "finish_reason": "stop", "message": {"role": "assistant", "content": "hello"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn user_turn_only_without_system_message() {
        let request = to_wire_request(&ChatRequestOptions::new("hi"), "gpt-4o");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[0].content, "hi");
    }

    #[test]
    fn empty_system_message_is_skipped() {
        let options = ChatRequestOptions::new("hi").with_system_message("");
        let request = to_wire_request(&options, "gpt-4o");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
    }

    #[test]
    fn system_turn_precedes_user_turn() {
        let options = ChatRequestOptions::new("hi").with_system_message("be terse");
        let request = to_wire_request(&options, "gpt-4o");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "be terse");
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "hi");
    }

    #[test]
    fn model_and_sampling_pass_through() {
        let options = ChatRequestOptions {
            temperature: Some(0.2),
            ..ChatRequestOptions::new("hi")
        };
        let request = to_wire_request(&options, "my-deployment");
        assert_eq!(request.model, "my-deployment");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.top_p, None);
    }

    #[test]
    fn last_context_merges_into_last_message() {
        let options = ChatRequestOptions::new("hi")
            .with_system_message("be terse")
            .with_last_context(context("c1", "p1"));
        let request = to_wire_request(&options, "gpt-4o");

        assert!(request.messages[0].extra.is_empty());
        let last = serde_json::to_value(&request.messages[1]).unwrap();
        assert_eq!(
            last,
            json!({
                "role": "user",
                "content": "hi",
                "conversationId": "c1",
                "parentMessageId": "p1",
            })
        );
    }

    #[test]
    fn last_context_overrides_role_and_content() {
        let mut ctx = context("c1", "p1");
        ctx.extra.insert("role".to_string(), json!("assistant"));
        ctx.extra.insert("content".to_string(), json!("replaced"));
        let options = ChatRequestOptions::new("hi").with_last_context(ctx);

        let request = to_wire_request(&options, "gpt-4o");
        assert_eq!(request.messages[0].role, Role::Assistant);
        assert_eq!(request.messages[0].content, "replaced");
        assert!(!request.messages[0].extra.contains_key("role"));
    }

    #[test]
    fn malformed_overrides_are_dropped() {
        let mut ctx = LastContext::default();
        ctx.extra.insert("role".to_string(), json!("narrator"));
        ctx.extra.insert("content".to_string(), json!(42));
        let options = ChatRequestOptions::new("hi").with_last_context(ctx);

        let request = to_wire_request(&options, "gpt-4o");
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[0].content, "hi");
        assert!(request.messages[0].extra.is_empty());
    }

    #[test]
    fn empty_last_context_changes_nothing() {
        let options = ChatRequestOptions::new("hi").with_last_context(LastContext::default());
        let request = to_wire_request(&options, "gpt-4o");
        assert_eq!(request.messages, vec![WireMessage::new(Role::User, "hi")]);
    }

    #[test]
    fn response_ids_are_linked() {
        let message = from_wire_response(fixture()).unwrap();
        assert_eq!(message.id, "r1");
        assert_eq!(message.parent_message_id, "r1");
        assert_eq!(message.conversation_id, "r1-conv");
        assert_eq!(message.text, "hello");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(
            message.detail,
            CompletionDetail {
                finish_reason: Some("stop".to_string()),
                created: 1,
                model: "gpt-4o".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn only_first_choice_is_used() {
        let response: WireResponse = serde_json::from_value(json!({
            "id": "r2",
            "created": 5,
            "model": "gpt-4o",
            "choices": [
                {"index": 0, "finish_reason": "stop", "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "finish_reason": "stop", "message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();

        assert_eq!(from_wire_response(response).unwrap().text, "first");
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let response: WireResponse = serde_json::from_value(json!({
            "id": "r3",
            "choices": [{"index": 0, "finish_reason": "content_filter", "message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();

        let message = from_wire_response(response).unwrap();
        assert_eq!(message.text, "");
        assert_eq!(message.detail.finish_reason.as_deref(), Some("content_filter"));
    }

    #[test]
    fn empty_choices_is_malformed() {
        let response: WireResponse =
            serde_json::from_value(json!({"id": "r1", "created": 1, "model": "gpt-4o", "choices": []}))
                .unwrap();
        let err = from_wire_response(response).unwrap_err();
        assert!(matches!(err, LLMError::MalformedResponse(_)));
    }

    #[test]
    fn choice_without_message_is_malformed() {
        let response: WireResponse = serde_json::from_value(json!({
            "id": "r1",
            "choices": [{"index": 0, "finish_reason": "stop"}]
        }))
        .unwrap();
        let err = from_wire_response(response).unwrap_err();
        assert!(err.to_string().contains("no message"));
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let err = parse_wire_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LLMError::MalformedResponse(_)));
    }
}
