use territory_game::game::traits::Game;
use territory_game::games::territory::{
    AgentId, Difficulty, GameInput, GameMode, MatchEvent, MenuAction, TerritoryGame,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("territory_game=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next().as_deref() {
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Normal,
    };

    let mut game = TerritoryGame::new();
    game.handle_input(GameInput::Menu(MenuAction::Play))?;
    game.handle_input(GameInput::Menu(MenuAction::SelectMode(GameMode::AiVsAi)))?;
    game.handle_input(GameInput::Menu(MenuAction::SelectDifficulty(difficulty)))?;
    tracing::info!(?difficulty, "running AI vs AI match");

    let mut interval = tokio::time::interval(game.tick_rate());
    while !game.is_over() {
        interval.tick().await;
        for event in game.tick() {
            match event {
                MatchEvent::PowerUpSpawned { position, kind } => {
                    tracing::info!(?kind, x = position.x, y = position.y, "power-up spawned");
                }
                MatchEvent::PowerUpCollected { agent, kind } => {
                    tracing::info!(?agent, ?kind, "power-up collected");
                }
                MatchEvent::AgentFrozen { agent, until } => {
                    tracing::info!(?agent, until, "agent frozen");
                }
                MatchEvent::MatchOver { outcome } => {
                    tracing::info!(?outcome, "match over");
                }
            }
        }
    }

    if let Some(field) = game.snapshot().field {
        println!(
            "final score: blue {} / green {}",
            field.blue.score, field.green.score
        );
        println!(
            "territory: blue {} cells / green {} cells",
            field
                .cells
                .iter()
                .filter(|c| **c == Some(AgentId::Blue))
                .count(),
            field
                .cells
                .iter()
                .filter(|c| **c == Some(AgentId::Green))
                .count()
        );
    }
    match game.outcome() {
        Some(outcome) => println!("outcome: {:?}", outcome),
        None => println!("outcome: unresolved"),
    }

    Ok(())
}
