use tracing::info;

use crate::resume::{keys, ResumeRecord};

/// Empty both cached peer lists. Present fields stay present with zero
/// length; absent ones are not created.
pub fn invalidate_peers(record: &mut ResumeRecord) {
    for key in [keys::PEERS_V4, keys::PEERS_V6] {
        if record.get_raw(key).is_some() {
            record.set_raw(key, &[]);
        }
    }
    info!("REPAIR: Peers cleared");
}
