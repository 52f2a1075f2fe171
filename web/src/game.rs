use crate::picker::DifficultyPicker;
use crate::staging::{self, RevealStaging, StagedBatch};
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use minefield_core as game;
use game::{CellIndex, Difficulty, GameSession, MoveOutcome, RevealOutcome, SessionState};
use serde::{Deserialize, Serialize};
use web_time::Instant;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewGameState {
    Ready,
    Active,
    Won,
    Lost,
}

impl ViewGameState {
    fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl From<SessionState> for ViewGameState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::NotStarted => Self::Ready,
            SessionState::Active => Self::Active,
            SessionState::Won => Self::Won,
            SessionState::Lost => Self::Lost,
        }
    }
}

fn cell_state_at(session: &GameSession, staging: &RevealStaging, index: CellIndex) -> ViewCellState {
    use ViewCellState::*;

    let board = session.board();
    if !board.is_initialized() || staging.is_held(index) {
        return Hidden;
    }

    let cell = board.cell(index);
    let misflagged = session
        .disclosure()
        .is_some_and(|report| report.incorrect_flag_indexes.contains(&index));
    match (cell.is_revealed(), cell.is_mined(), cell.is_flagged()) {
        (true, true, _) if cell.is_triggered() => TriggeredMine,
        (true, true, _) => Mine,
        (true, false, _) => Revealed(cell.adjacent_mine_count()),
        (false, _, true) if misflagged => Misflagged,
        (false, _, true) => Flagged,
        (false, _, false) => Hidden,
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    index: CellIndex,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    UpdateTime,
    NewGame,
    ChangeDifficulty(Difficulty),
    /// A staged batch coming due, tagged with the game that scheduled it.
    Release {
        generation: u32,
        indexes: Vec<CellIndex>,
    },
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: CellIndex,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        index,
        cell_state,
        pressed,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            TriggeredMine => classes!("open", "mine", "oops"),
            Mine => classes!("open", "mine"),
            Misflagged => classes!("flag", "wrong"),
        }
    );
    if pressed {
        class.push("open");
    }
    if locked {
        class.push("locked");
    }

    let content = match cell_state {
        Hidden | Revealed(0) => String::new(),
        Revealed(count) => count.to_string(),
        Flagged => "🚩".to_string(),
        TriggeredMine | Mine => "💣".to_string(),
        Misflagged => "❌".to_string(),
    };

    let onmousedown = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState { index, buttons }));
            log::trace!("{} mouse down ({:?})", index, buttons);
        })
    };

    let onmouseup = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState { index, buttons }));
            log::trace!("{} mouse up ({:?})", index, buttons);
        })
    };

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::Leave);
            log::trace!("{} mouse leave", index);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseleave}>{content}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed for the first game instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting difficulty: 1 easy, 2 medium, anything else hard
    #[arg(short, long, default_value_t = 1)]
    level: u8,
}

#[derive(Debug)]
pub(crate) struct GameView {
    difficulty: Difficulty,
    session: GameSession,
    staging: RevealStaging,
    forced_seed: Option<u64>,
    prev_time: u32,
    current_cell_state: Option<CellPointerState>,
    staged_timeouts: Vec<Timeout>,
    _timer_interval: Interval,
}

impl GameView {
    fn new_session(difficulty: Difficulty, forced_seed: &mut Option<u64>) -> GameSession {
        let seed = forced_seed.take().unwrap_or_else(js_random_seed);
        log::debug!("new {} game, seed: {}", difficulty.label(), seed);
        GameSession::new(difficulty, seed)
    }

    /// Drops the current session along with every staged update still in flight.
    fn new_game(&mut self) {
        self.staged_timeouts.clear();
        self.staging = RevealStaging::new(self.staging.generation().wrapping_add(1));
        self.session = Self::new_session(self.difficulty, &mut self.forced_seed);
        self.prev_time = 0;
        self.current_cell_state = None;
    }

    fn game_state(&self) -> ViewGameState {
        self.session.state().into()
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn face(&self) -> &'static str {
        match self.game_state() {
            ViewGameState::Ready | ViewGameState::Active if self.is_mid_open() => "😮",
            ViewGameState::Ready | ViewGameState::Active => "😐",
            ViewGameState::Won => "😎",
            ViewGameState::Lost => "😧",
        }
    }

    fn game_state_class(&self) -> Classes {
        classes!(match self.game_state() {
            ViewGameState::Ready | ViewGameState::Active if self.is_mid_open() => "mid-open",
            ViewGameState::Ready => "not-started",
            ViewGameState::Active => "in-progress",
            ViewGameState::Won => "win",
            ViewGameState::Lost => "lose",
        })
    }

    fn reveal_cell(&mut self, ctx: &Context<Self>, index: CellIndex) -> bool {
        let outcome = self.session.reveal(index, Instant::now());

        let batches = match &outcome {
            MoveOutcome::NoChange => return false,
            MoveOutcome::Revealed(RevealOutcome::Flood(opened))
            | MoveOutcome::Won(RevealOutcome::Flood(opened)) => staging::plan_flood(opened),
            MoveOutcome::Lost(report) => staging::plan_disclosure(&report.disclosed_mine_indexes),
            MoveOutcome::Revealed(_) | MoveOutcome::Won(_) => Vec::new(),
        };
        self.stage(ctx, batches);

        match outcome {
            MoveOutcome::Won(_) => {
                log::info!("won in {}s", self.session.elapsed_secs(Instant::now()));
            }
            MoveOutcome::Lost(report) => {
                log::info!(
                    "lost on cell {:?}, {} incorrect flags",
                    self.session.board().coords_of(report.triggered_index),
                    report.incorrect_flag_indexes.len()
                );
            }
            _ => {}
        }
        true
    }

    fn mark_cell(&mut self, index: CellIndex) -> bool {
        let outcome = self.session.toggle_flag(index);
        log::trace!("flag {}: {:?}", index, outcome);
        outcome.has_update()
    }

    fn stage(&mut self, ctx: &Context<Self>, batches: Vec<StagedBatch>) {
        self.staging.hold(&batches);
        let generation = self.staging.generation();
        for StagedBatch { delay_ms, indexes } in batches {
            let link = ctx.link().clone();
            self.staged_timeouts.push(Timeout::new(delay_ms, move || {
                link.send_message(Msg::Release {
                    generation,
                    indexes,
                })
            }));
        }
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn is_pressed(&self, index: CellIndex, cell_state: ViewCellState) -> bool {
        if self.game_state().is_finished() || cell_state != ViewCellState::Hidden {
            return false;
        }

        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                index: pressed,
                buttons: MouseButtons::LEFT,
            }) if pressed == index
        )
    }

    fn is_locked(&self, cell_state: ViewCellState) -> bool {
        self.game_state().is_finished()
            || !matches!(cell_state, ViewCellState::Hidden | ViewCellState::Flagged)
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let difficulty = Difficulty::from_level(props.level);
        let mut forced_seed = props.seed;
        Self {
            difficulty,
            session: Self::new_session(difficulty, &mut forced_seed),
            staging: RevealStaging::new(0),
            forced_seed,
            prev_time: 0,
            current_cell_state: None,
            staged_timeouts: Vec::new(),
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        match msg {
            CellEvent(Leave) => {
                log::trace!("cell leave");
                self.current_cell_state.take().is_some()
            }
            CellEvent(Update(cell_state)) => {
                log::trace!("cell update: {:?}", cell_state);
                if cell_state.buttons.is_empty() {
                    match self.current_cell_state.take() {
                        None => false,
                        Some(CellPointerState { index, buttons }) => {
                            match buttons {
                                MouseButtons::LEFT => {
                                    log::debug!("reveal cell: {}", index);
                                    self.reveal_cell(ctx, index);
                                }
                                MouseButtons::RIGHT => {
                                    log::debug!("mark cell: {}", index);
                                    self.mark_cell(index);
                                }
                                _ => {}
                            }
                            true
                        }
                    }
                } else {
                    self.current_cell_state.replace(cell_state) != Some(cell_state)
                }
            }
            UpdateTime => {
                let time = self.session.elapsed_secs(Instant::now());
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.new_game();
                true
            }
            ChangeDifficulty(difficulty) => {
                if self.difficulty != difficulty {
                    log::debug!("difficulty for next game: {}", difficulty.label());
                    self.difficulty = difficulty;
                    true
                } else {
                    false
                }
            }
            Release {
                generation,
                indexes,
            } => {
                let released = self.staging.release(generation, &indexes);
                if released && !self.staging.has_pending() {
                    self.staged_timeouts.clear();
                }
                released
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let board = self.session.board();
        let (cols, rows) = board.size();
        let game_state = self.game_state();
        let flags_remaining = format_for_counter(self.session.flags_remaining().into(), 2);
        let elapsed_time = format_for_counter(self.session.elapsed_secs(Instant::now()), 3);
        let result = match game_state {
            ViewGameState::Won => Some("You win"),
            ViewGameState::Lost => Some("You lose"),
            ViewGameState::Ready | ViewGameState::Active => None,
        };

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_difficulty = ctx.link().callback(ChangeDifficulty);

        html! {
            <div class="minefield" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{flags_remaining}</aside>
                    <span><button class={self.game_state_class()} onclick={cb_new_game}>{self.face()}</button></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <table class={(!game_state.is_finished()).then_some("playable")}>
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let index = board.index_of((x, y));
                                        let cell_state = cell_state_at(&self.session, &self.staging, index);
                                        let pressed = self.is_pressed(index, cell_state);
                                        let locked = self.is_locked(cell_state);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {index} {cell_state} {callback} {pressed} {locked}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(text) = result {
                    <div class="result">{text}</div>
                }
                <DifficultyPicker difficulty={self.difficulty} on_change={cb_difficulty}/>
            </div>
        }
    }
}
