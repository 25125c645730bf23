mod property_tests;
mod risk_tests;
mod sim_tests;
mod snapshot_tests;
