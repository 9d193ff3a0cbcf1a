pub(crate) use registration::Registration;

mod registration;
