use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use trellis_core::{Element, Event, HostId, MemoryHost, RenderError, Root};
use trellis_runtime_std::StdRuntime;

mod demos;
mod form;

/// One demo mounted on its own runtime and in-memory host.
struct Session {
    runtime: StdRuntime,
    root: Root<MemoryHost>,
}

impl Session {
    fn start(name: &str, app: Element) -> Result<Self, RenderError> {
        println!("--- {name} ---");
        let runtime = StdRuntime::from_env();
        let mut host = MemoryHost::new();
        let container = host.create_container("body");
        let root = runtime.root(host, container);
        root.render(app)?;
        let session = Self { runtime, root };
        session.print("mounted");
        Ok(session)
    }

    fn node(&self, id: &str) -> Option<HostId> {
        self.root
            .with_host(|host| host.find_by_attribute(self.root.container(), "id", id))
    }

    fn fire(&self, event: Event, label: &str) -> Result<(), RenderError> {
        self.root.dispatch(event);
        if let Some(err) = self.root.take_error() {
            return Err(err);
        }
        self.runtime.run_frame(&self.root)?;
        self.print(label);
        Ok(())
    }

    fn click(&self, id: &str) -> Result<(), RenderError> {
        match self.node(id) {
            Some(target) => self.fire(Event::new("click", target), &format!("click #{id}")),
            None => {
                log::warn!("no #{id} to click");
                Ok(())
            }
        }
    }

    fn input(&self, id: &str, value: &str) -> Result<(), RenderError> {
        match self.node(id) {
            Some(target) => self.fire(
                Event::new("input", target).with_value(value),
                &format!("input #{id} = {value:?}"),
            ),
            None => {
                log::warn!("no #{id} to type into");
                Ok(())
            }
        }
    }

    fn print(&self, label: &str) {
        let html = self
            .root
            .with_host(|host| host.inner_html(self.root.container()));
        println!("[{label}] {html}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let counter = Session::start("useState", demos::Counter())?;
    counter.click("increment")?;
    counter.click("increment")?;
    counter.click("decrement")?;

    let title = Rc::new(RefCell::new(demos::DEFAULT_TITLE.to_string()));
    let effect = Session::start("useEffect", demos::ClickTitle(Rc::clone(&title)))?;
    println!("title: {}", title.borrow());
    effect.click("click")?;
    println!("title: {}", title.borrow());
    effect.root.unmount()?;
    println!("title after unmount: {}", title.borrow());

    let list = Session::start("keys", demos::KeyedList())?;
    list.click("remove-3")?;
    list.click("add")?;

    let wizard = Session::start("form", form::form_wizard())?;
    wizard.input("basicData.firstName", "Ada")?;
    wizard.input("basicData.lastName", "Lovelace")?;
    wizard.click("next")?;
    wizard.input("addressData.city", "London")?;
    wizard.click("next")?;
    wizard.click("submit")?;

    match form::FormAction::parse("update.basicData.nickname", "x") {
        Ok(action) => println!("parsed {action:?}"),
        Err(err) => println!("rejected action: {err}"),
    }

    println!("--- server rendering ---");
    let html = futures::executor::block_on(trellis_ssr::render_to_string(&Element::fragment([
        demos::Counter(),
        demos::KeyedList(),
    ])))?;
    println!("{html}");
    Ok(())
}
