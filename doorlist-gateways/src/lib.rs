pub mod opencage;
pub mod openplz;
pub mod timeout;
