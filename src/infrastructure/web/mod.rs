pub mod trigger_controller;
