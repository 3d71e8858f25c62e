pub mod cash_outlay;
pub mod downpayment;
pub mod grants;
pub mod stamp_duty;
