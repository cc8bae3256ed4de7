pub mod bencode;
pub mod record;

pub use record::ResumeRecord;

/// Field names as written by Transmission.
pub mod keys {
    pub const DESTINATION: &str = "destination";
    pub const NAME: &str = "name";
    pub const ADDED_DATE: &str = "added-date";
    pub const DONE_DATE: &str = "done-date";
    pub const ACTIVITY_DATE: &str = "activity-date";
    pub const PEERS_V4: &str = "peers2";
    pub const PEERS_V6: &str = "peers2-6";

    pub const INCOMPLETE_DIR: &str = "incomplete-dir";
    pub const DOWNLOADED: &str = "downloaded";
    pub const UPLOADED: &str = "uploaded";
    pub const PAUSED: &str = "paused";
    pub const SEEDING_TIME: &str = "seeding-time-seconds";
    pub const DOWNLOADING_TIME: &str = "downloading-time-seconds";
    pub const BANDWIDTH_PRIORITY: &str = "bandwidth-priority";
    pub const MAX_PEERS: &str = "max-peers";
    pub const SPEED_LIMIT_UP: &str = "speed-limit-up";
    pub const SPEED_LIMIT_DOWN: &str = "speed-limit-down";
    pub const SPEED_BPS: &str = "speed-Bps";
    pub const SPEED: &str = "speed";
    pub const USE_SPEED_LIMIT: &str = "use-speed-limit";
    pub const USE_GLOBAL_SPEED_LIMIT: &str = "use-global-speed-limit";
}
