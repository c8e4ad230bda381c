pub mod watch_commands;

/*
CLI Module Tests

Argument parsing for the watch commands.
*/
