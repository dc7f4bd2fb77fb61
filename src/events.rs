/// What a key press asks the main loop to do
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// Switch between running and paused
    TogglePause,

    /// Advance exactly one generation while paused
    Step,

    /// Exit the application, if the quit key is enabled
    Quit,

    /// Exit the application no matter what. Raw mode eats `SIGINT`, so this is how `Ctrl-C` comes
    /// through.
    Interrupt,
}
