use std::{cell::RefCell, rc::Rc};

use lcdmenu::{
    ManualClock, MenuController, MenuItem, MenuRenderer, MenuScreen,
    display::CellBuffer,
    event::{BACK, BACKSPACE, DOWN, ENTER, LEFT, RIGHT, UP},
    item::{self, ItemWidget, basic, submenu},
    render::CharacterRenderer,
    widget::{WidgetList, WidgetRange},
};

type Menu = MenuController<CharacterRenderer<CellBuffer>, ManualClock>;

fn menu_with(screens: Vec<MenuScreen>) -> Menu {
    let renderer = CharacterRenderer::new(CellBuffer::new(20, 2), 20, 2);
    let mut menu = MenuController::with_clock(renderer, ManualClock::new(0));
    for screen in screens {
        menu.add_screen(screen);
    }
    menu.begin().unwrap();
    menu
}

fn line(menu: &Menu, row: usize) -> String {
    menu.renderer().display().line(row).trim_end().to_string()
}

fn alarm(commits: &Rc<RefCell<Vec<(u8, u8)>>>) -> Box<dyn MenuItem> {
    let sink = Rc::clone(commits);
    let widgets = (
        WidgetRange::new(9u8, 1, 0, 23).format(|hour| format!("{hour:02}")),
        WidgetRange::new(30u8, 5, 0, 55).format(|minute| format!(":{minute:02}")),
    );
    Box::new(ItemWidget::new("Alarm", widgets).on_commit(move |values| sink.borrow_mut().push(values)))
}

#[test]
fn composite_walks_its_widgets_and_commits_on_the_last() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let mut menu = menu_with(vec![MenuScreen::new(vec![alarm(&commits), basic("Other")])]);
    assert_eq!(line(&menu, 0), ">Alarm:09:30");

    assert!(menu.process(ENTER).unwrap());
    assert!(menu.renderer().is_in_edit_mode());
    assert_eq!(line(&menu, 0), "*Alarm:09:30");
    // Caret under the last digit of the hour.
    assert_eq!(menu.renderer().display().cursor(), (8, 0));
    assert!(menu.renderer().display().is_blinking());

    assert!(menu.process(RIGHT).unwrap());
    assert_eq!(menu.renderer().display().cursor(), (11, 0));

    assert!(menu.process(ENTER).unwrap());
    assert!(!menu.renderer().is_in_edit_mode());
    assert_eq!(*commits.borrow(), vec![(9, 30)]);
    assert_eq!(line(&menu, 0), ">Alarm:09:30");
    assert!(!menu.renderer().display().is_blinking());
}

#[test]
fn widgets_claim_commands_before_the_screen() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let mut menu = menu_with(vec![MenuScreen::new(vec![alarm(&commits), basic("Other")])]);

    menu.process(ENTER).unwrap();
    assert!(menu.process(UP).unwrap());
    assert!(menu.process(UP).unwrap());
    assert_eq!(menu.cursor(), 0);
    assert_eq!(line(&menu, 0), "*Alarm:11:30");

    menu.process(RIGHT).unwrap();
    assert!(menu.process(DOWN).unwrap());
    assert_eq!(menu.cursor(), 0);
    assert_eq!(line(&menu, 0), "*Alarm:11:25");
    assert_eq!(line(&menu, 1), " Other");

    // LEFT from the first widget wraps around to the last.
    menu.process(LEFT).unwrap();
    menu.process(LEFT).unwrap();
    assert!(menu.process(BACK).unwrap());
    assert_eq!(*commits.borrow(), vec![(11, 25)]);

    assert!(menu.process(DOWN).unwrap());
    assert_eq!(menu.cursor(), 1);
}

#[test]
fn back_while_editing_commits_once_and_stays_on_the_screen() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commits);
    let root = MenuScreen::new(vec![submenu("Settings", 1)]);
    let settings = MenuScreen::new(vec![
        item::toggle("Sound", false, move |enabled| sink.borrow_mut().push(enabled)),
        item::back("Back"),
    ]);
    let mut menu = menu_with(vec![root, settings]);

    menu.process(ENTER).unwrap();
    assert_eq!(menu.active_screen(), 1);
    assert_eq!(line(&menu, 0), ">Sound:OFF");

    menu.process(ENTER).unwrap();
    menu.process(UP).unwrap();
    assert_eq!(line(&menu, 0), "*Sound:ON");
    assert!(menu.process(BACK).unwrap());
    assert_eq!(menu.active_screen(), 1);
    assert_eq!(*commits.borrow(), vec![true]);
    assert_eq!(line(&menu, 0), ">Sound:ON");

    assert!(menu.process(BACK).unwrap());
    assert_eq!(menu.active_screen(), 0);
    assert_eq!(commits.borrow().len(), 1);
}

#[test]
fn text_input_edits_in_place() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commits);
    let screen = MenuScreen::new(vec![
        item::input("Name", "Al", move |name| sink.borrow_mut().push(name.to_string())),
        basic("Other"),
    ]);
    let mut menu = menu_with(vec![screen]);

    menu.process(ENTER).unwrap();
    assert_eq!(menu.renderer().display().cursor(), (8, 0));
    for command in [b'e', b'x', BACKSPACE, b'f'] {
        assert!(menu.process(command).unwrap());
    }
    assert_eq!(line(&menu, 0), "*Name:Alef");
    assert!(menu.process(DOWN).unwrap());
    assert_eq!(menu.cursor(), 0);

    menu.process(BACK).unwrap();
    assert_eq!(*commits.borrow(), vec!["Alef".to_string()]);
    assert_eq!(line(&menu, 0), ">Name:Alef");
}

#[test]
fn commands_fire_straight_away() {
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    let screen = MenuScreen::new(vec![item::command("Reboot", move || *counter.borrow_mut() += 1)]);
    let mut menu = menu_with(vec![screen]);

    assert!(menu.process(ENTER).unwrap());
    assert!(menu.process(ENTER).unwrap());
    assert_eq!(*fired.borrow(), 2);
    assert!(!menu.renderer().is_in_edit_mode());
    assert_eq!(line(&menu, 0), ">Reboot");
}

#[test]
fn list_widget_wraps_when_cycling() {
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picked);
    let colors = (WidgetList::new(vec!["Red", "Green", "Blue"], 2).cycle(true),);
    let entry: Box<dyn MenuItem> =
        Box::new(ItemWidget::new("Color", colors).on_commit(move |(index,)| sink.borrow_mut().push(index)));
    let mut menu = menu_with(vec![MenuScreen::new(vec![entry])]);
    assert_eq!(line(&menu, 0), ">Color:Blue");

    menu.process(ENTER).unwrap();
    menu.process(UP).unwrap();
    assert_eq!(line(&menu, 0), "*Color:Red");
    menu.process(ENTER).unwrap();
    assert_eq!(*picked.borrow(), vec![0]);
}
