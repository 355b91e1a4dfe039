use crate::app::App;
use crate::input::InputAction;
use rankguess_core::Guess;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Dismiss => app.show_help = false,
        InputAction::Activate => app.activate_primary(),
        InputAction::GuessHigher => app.guess(Guess::Higher),
        InputAction::GuessLower => app.guess(Guess::Lower),
        InputAction::NextRound => app.next_round(),
        InputAction::Restart => app.restart(),
    }
}
