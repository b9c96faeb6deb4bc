/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a store key for a new record.
///
/// UUID v4, so concurrent creators never need to coordinate.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
