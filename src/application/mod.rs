/// アプリケーション層
///
/// ドメインとインフラストラクチャを組み合わせたユースケースを提供する。
pub mod services;
pub mod use_cases;
