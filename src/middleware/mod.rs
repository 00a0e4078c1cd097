/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: bearer gate (AuthCtx を載せるだけで、リクエストは止めない)
 * - cors / http: 横断的な transport 設定
 */
pub mod auth;
pub mod cors;
pub mod http;
