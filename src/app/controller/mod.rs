pub mod advisor_controllers;
