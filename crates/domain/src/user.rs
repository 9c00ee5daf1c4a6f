//! # ユーザー
//!
//! 認証はゲートウェイが担当し、このサービスはユーザー ID のみを受け取る。

define_int_id! {
    /// ユーザー ID（`users.id`）
    pub struct UserId;
}
