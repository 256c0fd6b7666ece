//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that the presentation layer uses to pick
//! how a failure is shown (inline field message, dialog, generic retry notice).

use serde::Serialize;

/// エラー種別の列挙体
///
/// 失敗の分類を定義します。プレゼンテーション層は種別に応じて
/// 表示方法（入力欄のメッセージ、ダイアログ、再試行の案内）を選びます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.code(), "NOT_FOUND");
/// assert_eq!(kind.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 入力が不正または不足している（ストレージに触れる前に検出）
    Validation,
    /// 認証情報が一致しない、またはセッションがない
    Unauthorized,
    /// 権限がない（自分自身の削除、管理者以外の操作など）
    Forbidden,
    /// 対象が見つからない
    NotFound,
    /// 一意制約と競合（ユーザー名・メール・コース名の重複）
    Conflict,
    /// 残高不足
    InsufficientFunds,
    /// ストレージ（トランザクション・接続）の失敗
    Storage,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// 機械可読なコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.code(), "VALIDATION");
    /// assert_eq!(ErrorKind::InsufficientFunds.code(), "INSUFFICIENT_FUNDS");
    /// ```
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorKind::Storage => "STORAGE",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Forbidden.as_str(), "Forbidden");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation Error",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InsufficientFunds => "Insufficient Funds",
            ErrorKind::Storage => "Storage Error",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// ストレージ側・内部の失敗かどうかを判定
    ///
    /// `true` の場合、詳細はユーザーに見せず、ログに記録すべきです。
    #[inline]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, ErrorKind::Storage | ErrorKind::Internal)
    }

    /// 利用者の入力・操作に起因する失敗かどうかを判定
    #[inline]
    pub const fn is_user_error(&self) -> bool {
        !self.is_storage_failure()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
