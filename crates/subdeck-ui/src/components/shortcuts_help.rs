use crate::components::use_i18n;
use crate::core::shortcuts::SHORTCUT_HELP;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ShortcutsHelpProps {
    pub on_close: Callback<()>,
}

#[function_component(ShortcutsHelp)]
pub(crate) fn shortcuts_help(props: &ShortcutsHelpProps) -> Html {
    let i18n = use_i18n();
    let on_close = {
        let emit = props.on_close.clone();
        Callback::from(move |_: MouseEvent| emit.emit(()))
    };
    html! {
        <div class="overlay" role="dialog" aria-modal="true" aria-labelledby="shortcuts-title">
            <div class="panel">
                <h2 id="shortcuts-title">{i18n.text("shortcuts.title")}</h2>
                <table class="shortcuts">
                    {for SHORTCUT_HELP.iter().map(|(keys, label)| html! {
                        <tr>
                            <td><kbd>{*keys}</kbd></td>
                            <td>{i18n.text(label)}</td>
                        </tr>
                    })}
                </table>
                <button type="button" class="btn" onclick={on_close}>{i18n.text("common.close")}</button>
            </div>
        </div>
    }
}
