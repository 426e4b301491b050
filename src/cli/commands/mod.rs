pub mod db;
pub mod note;
pub mod notification;
pub mod sync;
pub mod task;

#[cfg(test)]
#[path = "note_test.rs"]
mod note_test;


#[cfg(test)]
#[path = "notification_test.rs"]
mod notification_test;
