pub mod authenticate;
pub mod cancel_subscription;
pub mod execute_payment;
pub mod login;
pub mod lookup_user;
pub mod register;
pub mod subscribe;
pub mod update_subscription;
pub mod upgrade_admin;

#[cfg(test)]
pub(crate) mod test_support;
