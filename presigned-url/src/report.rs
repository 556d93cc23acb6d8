//! Console rendering of command results

use chrono::SecondsFormat;
use serde::Serialize;

use crate::provider::SignedUrlResult;

const HEAVY_RULE_WIDTH: usize = 80;
const LIST_RULE_WIDTH: usize = 60;

/// Human-readable report for a generated URL
#[must_use]
pub fn signed_url(result: &SignedUrlResult) -> String {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);
    let light = "-".repeat(HEAVY_RULE_WIDTH);

    format!(
        "\n{heavy}\n\
         Signed URL generated\n\
         {heavy}\n\
         Object key: {key}\n\
         Expires in: {secs} seconds ({mins} minutes)\n\
         Expires at: {at}\n\
         \n\
         Signed URL:\n\
         {light}\n\
         {url}\n\
         {light}\n\
         \n\
         This URL can be used until the expiry time above.\n\
         {heavy}\n\n",
        key = result.object_key,
        secs = result.expires_in_seconds,
        mins = result.expires_in_seconds / 60,
        at = result.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        url = result.url,
    )
}

/// Human-readable listing of the logical names available in `bucket_name`
#[must_use]
pub fn object_list(bucket_name: &str, names: &[String]) -> String {
    let mut out = format!(
        "\nAvailable objects (bucket: {bucket_name}):\n{}\n",
        "-".repeat(LIST_RULE_WIDTH)
    );

    if names.is_empty() {
        out.push_str("  No objects found\n");
    }
    for name in names {
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }
    out.push('\n');

    out
}

/// Pretty-printed JSON rendering of any result
///
/// # Errors
///
/// Returns an error if the value cannot be serialized
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value).map(|mut s| {
        s.push('\n');
        s
    })
}
