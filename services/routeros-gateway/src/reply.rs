//! Reply flattening.

use routeros_client::{Reply, ReplyRow};

/// Data records of a reply, in order.
///
/// Only `!re` sentences that carry attributes are kept; trailers, traps, and
/// empty markers are dropped.
pub fn data_rows(reply: Reply) -> Vec<ReplyRow> {
    reply
        .sentences
        .into_iter()
        .filter(|sentence| sentence.is_data_record())
        .filter_map(|sentence| sentence.attributes)
        .collect()
}
