use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn minutes(value: u64) -> Duration {
    Duration::minutes(value.min((i64::MAX / 60) as u64) as i64)
}

pub(crate) fn days(value: u64) -> Duration {
    Duration::days(value.min((i64::MAX / 86_400) as u64) as i64)
}
