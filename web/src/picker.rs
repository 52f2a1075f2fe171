use minefield_core::Difficulty;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DifficultyPickerProps {
    pub difficulty: Difficulty,
    pub on_change: Callback<Difficulty>,
}

/// Easier/harder arrows around the preset label. The choice applies to the next new game.
#[function_component]
pub(crate) fn DifficultyPicker(props: &DifficultyPickerProps) -> Html {
    let difficulty = props.difficulty;

    let on_easier = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(difficulty.easier()))
    };
    let on_harder = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(difficulty.harder()))
    };

    html! {
        <footer class="difficulty">
            <button onclick={on_easier} disabled={difficulty.easier() == difficulty}>{"◀"}</button>
            <span>{difficulty.label()}</span>
            <button onclick={on_harder} disabled={difficulty.harder() == difficulty}>{"▶"}</button>
        </footer>
    }
}
