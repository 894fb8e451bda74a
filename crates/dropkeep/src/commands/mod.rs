pub mod backup;
pub mod destroy;
pub mod keys;
pub mod restore;
pub mod show;
pub mod snapshots;
