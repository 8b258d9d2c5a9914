//! Diagnostic text for upstream HTTP status codes.

use std::borrow::Cow;

const STATUS_MESSAGES: &[(u16, &str)] = &[
    (401, "[OpenAI] 提供错误的API密钥 | Incorrect API key provided"),
    (
        403,
        "[OpenAI] 服务器拒绝访问，请稍后再试 | Server refused to access, please try again later",
    ),
    (500, "[OpenAI] 服务器繁忙，请稍后再试 | Internal Server Error"),
    (502, "[OpenAI] 错误的网关 | Bad Gateway"),
    (
        503,
        "[OpenAI] 服务器繁忙，请稍后再试 | Server is busy, please try again later",
    ),
    (504, "[OpenAI] 网关超时 | Gateway Time-out"),
];

/// Look up the bilingual message for `status`, falling back to a generic one.
pub fn status_message(status: u16) -> Cow<'static, str> {
    STATUS_MESSAGES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| Cow::Borrowed(*message))
        .unwrap_or_else(|| {
            Cow::Owned(format!(
                "[OpenAI] 请求失败，状态码 {status} | Request failed with status {status}"
            ))
        })
}
