mod client_key_test;
mod settings_test;
