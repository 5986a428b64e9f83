//! Three-page sign-up wizard. Field updates travel as `update.<page>.<field>`
//! actions through a reducer; the wizard state is shared with the pages
//! through a context.

use std::fmt;

use trellis_core::prelude::*;
use trellis_core::Dispatch;
use trellis_macros::component;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Basic,
    Address,
    Payment,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Basic, Page::Address, Page::Payment];

    /// Path segment naming this page in an action.
    pub fn key(self) -> &'static str {
        match self {
            Page::Basic => "basicData",
            Page::Address => "addressData",
            Page::Payment => "paymentData",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Basic => "Basic Information",
            Page::Address => "Address Information",
            Page::Payment => "Payment Information",
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Page::Basic => &[
                Field::FirstName,
                Field::LastName,
                Field::Email,
                Field::Phone,
            ],
            Page::Address => &[Field::Street, Field::City, Field::State, Field::Zip],
            Page::Payment => &[Field::CardNumber, Field::CardExpiry, Field::CardCvc],
        }
    }

    fn from_key(key: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.key() == key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Street,
    City,
    State,
    Zip,
    CardNumber,
    CardExpiry,
    CardCvc,
}

impl Field {
    pub fn page(self) -> Page {
        match self {
            Field::FirstName | Field::LastName | Field::Email | Field::Phone => Page::Basic,
            Field::Street | Field::City | Field::State | Field::Zip => Page::Address,
            Field::CardNumber | Field::CardExpiry | Field::CardCvc => Page::Payment,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Street => "street",
            Field::City => "city",
            Field::State => "state",
            Field::Zip => "zip",
            Field::CardNumber => "cardNumber",
            Field::CardExpiry => "cardExpiry",
            Field::CardCvc => "cardCVC",
        }
    }

    /// `page.field`, also used as the input's `id`.
    pub fn path(self) -> String {
        format!("{}.{}", self.page().key(), self.key())
    }

    fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Street => "Street",
            Field::City => "City",
            Field::State => "State",
            Field::Zip => "Zip Code",
            Field::CardNumber => "Card Number",
            Field::CardExpiry => "Card Expiry",
            Field::CardCvc => "Card CVC",
        }
    }

    fn input_type(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Phone => "tel",
            _ => "text",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddressData {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentData {
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvc: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    pub basic: BasicData,
    pub address: AddressData,
    pub payment: PaymentData,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.basic.first_name,
            Field::LastName => &self.basic.last_name,
            Field::Email => &self.basic.email,
            Field::Phone => &self.basic.phone,
            Field::Street => &self.address.street,
            Field::City => &self.address.city,
            Field::State => &self.address.state,
            Field::Zip => &self.address.zip,
            Field::CardNumber => &self.payment.card_number,
            Field::CardExpiry => &self.payment.card_expiry,
            Field::CardCvc => &self.payment.card_cvc,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.basic.first_name,
            Field::LastName => &mut self.basic.last_name,
            Field::Email => &mut self.basic.email,
            Field::Phone => &mut self.basic.phone,
            Field::Street => &mut self.address.street,
            Field::City => &mut self.address.city,
            Field::State => &mut self.address.state,
            Field::Zip => &mut self.address.zip,
            Field::CardNumber => &mut self.payment.card_number,
            Field::CardExpiry => &mut self.payment.card_expiry,
            Field::CardCvc => &mut self.payment.card_cvc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormError {
    /// The action kind does not start with `update.`.
    UnknownAction(String),
    /// A path segment that names no page or field.
    UnknownKey(String),
    /// The path stops at a page without naming a field.
    MissingField(&'static str),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::UnknownAction(kind) => write!(f, "unknown form action `{kind}`"),
            FormError::UnknownKey(key) => write!(f, "invalid key: {key}"),
            FormError::MissingField(page) => write!(f, "no field given for `{page}`"),
        }
    }
}

impl std::error::Error for FormError {}

/// Sets one field of [`FormData`].
#[derive(Clone, Debug, PartialEq)]
pub struct FormAction {
    pub field: Field,
    pub value: String,
}

impl FormAction {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Parses `update.<page>.<field>`, checking every segment before anything
    /// is applied.
    pub fn parse(kind: &str, value: impl Into<String>) -> Result<Self, FormError> {
        let path = kind
            .strip_prefix("update.")
            .ok_or_else(|| FormError::UnknownAction(kind.to_string()))?;
        let mut segments = path.split('.');
        let page_key = segments.next().unwrap_or_default();
        let page =
            Page::from_key(page_key).ok_or_else(|| FormError::UnknownKey(page_key.to_string()))?;
        let field_key = segments.next().ok_or(FormError::MissingField(page.key()))?;
        let field = page
            .fields()
            .iter()
            .copied()
            .find(|field| field.key() == field_key)
            .ok_or_else(|| FormError::UnknownKey(field_key.to_string()))?;
        if let Some(extra) = segments.next() {
            return Err(FormError::UnknownKey(extra.to_string()));
        }
        Ok(Self::new(field, value))
    }
}

pub fn reduce(data: &FormData, action: FormAction) -> FormData {
    let mut next = data.clone();
    *next.get_mut(action.field) = action.value;
    next
}

/// Everything the pages read from the wizard.
#[derive(Clone)]
pub struct WizardState {
    pub data: FormData,
    dispatch: Dispatch<FormData, FormAction>,
    set_page: SetState<Page>,
}

impl WizardState {
    pub fn go_to(&self, page: Page) {
        self.set_page.set(page);
    }

    pub fn submit(&self) {
        log::info!("form submitted with {:?}", self.data);
    }
}

pub type WizardContext = Context<Option<WizardState>>;

fn wizard_state(cx: &Scope, context: &WizardContext) -> WizardState {
    match use_context(cx, context) {
        Some(state) => state,
        None => panic!("form pages must be rendered inside FormWizard"),
    }
}

/// The complete wizard, starting on the basic page.
pub fn form_wizard() -> Element {
    FormWizard(create_context(None))
}

#[component]
fn FormWizard(cx: &Scope, context: WizardContext) -> Render {
    let (page, set_page) = use_state(cx, || Page::Basic);
    let (data, dispatch) = use_reducer(cx, reduce, FormData::default);
    let state = use_memo(cx, (data.clone(), page), move || WizardState {
        data,
        dispatch,
        set_page,
    });

    let body = match page {
        Page::Basic => BasicForm(context.clone()),
        Page::Address => AddressForm(context.clone()),
        Page::Payment => PaymentForm(context.clone()),
    };
    Ok(context.provider(
        Some(state),
        tag("div")
            .style("padding", "20px")
            .style("border", "1px solid #ccc")
            .style("border-radius", "5px")
            .style("display", "flex")
            .style("flex-direction", "column")
            .style("gap", "10px")
            .child(tag("h2").child("Form Example"))
            .child(tag("h1").attr("id", "title").child(page.title()))
            .child(body),
    ))
}

fn inputs(context: &WizardContext, page: Page) -> impl Iterator<Item = Element> + '_ {
    page.fields()
        .iter()
        .map(move |&field| Input(context.clone(), field).with_key(field.path()))
}

fn button(id: &str, label: &str, on_click: impl Fn(&Event) + 'static) -> Element {
    tag("button")
        .attr("id", id)
        .attr("type", "button")
        .style("padding", "10px 20px")
        .style("background-color", "#007bff")
        .style("color", "#fff")
        .style("border", "none")
        .style("width", "100%")
        .on("click", on_click)
        .child(label)
        .into()
}

#[component]
fn Input(cx: &Scope, context: WizardContext, field: Field) -> Render {
    let state = wizard_state(cx, &context);
    let dispatch = state.dispatch.clone();
    let on_input = use_callback(cx, field, move |event: &Event| {
        let value = event.value.clone().unwrap_or_default();
        dispatch.dispatch(FormAction::new(field, value));
    });
    let path = field.path();

    Ok(tag("div")
        .style("display", "flex")
        .style("flex-direction", "column")
        .child(tag("label").attr("for", path.as_str()).child(field.label()))
        .child(
            tag("input")
                .attr("id", path.as_str())
                .attr("type", field.input_type())
                .attr("value", state.data.get(field))
                .on_handler("input", on_input),
        )
        .into())
}

#[component]
fn BasicForm(cx: &Scope, context: WizardContext) -> Render {
    let state = wizard_state(cx, &context);
    Ok(tag("div")
        .children(inputs(&context, Page::Basic))
        .child(button("next", "Next: Address Information", move |_| {
            state.go_to(Page::Address)
        }))
        .into())
}

#[component]
fn AddressForm(cx: &Scope, context: WizardContext) -> Render {
    let state = wizard_state(cx, &context);
    Ok(tag("div")
        .children(inputs(&context, Page::Address))
        .child(button("next", "Next: Payment Information", move |_| {
            state.go_to(Page::Payment)
        }))
        .into())
}

/// Lets the payment page open the summary modal it renders.
#[derive(Clone)]
pub struct ModalHandle {
    set_visible: SetState<bool>,
}

impl ModalHandle {
    pub fn open(&self) {
        self.set_visible.set(true);
    }
}

#[component]
fn PaymentForm(cx: &Scope, context: WizardContext) -> Render {
    let state = wizard_state(cx, &context);
    let modal = use_ref(cx, || None::<ModalHandle>);
    let opener = modal.clone();

    Ok(tag("div")
        .child(SummaryModal(context.clone(), modal))
        .children(inputs(&context, Page::Payment))
        .child(button("submit", "Start Over", move |_| {
            state.submit();
            if let Some(handle) = opener.get() {
                handle.open();
            }
        }))
        .into())
}

#[component]
fn SummaryModal(cx: &Scope, context: WizardContext, handle: RefBox<Option<ModalHandle>>) -> Render {
    let (visible, set_visible) = use_state(cx, || false);
    let state = wizard_state(cx, &context);
    use_imperative_handle(cx, &handle, (), || ModalHandle {
        set_visible: set_visible.clone(),
    });
    if !visible {
        return Ok(Element::Empty);
    }

    let summary = format!("{:#?}", state.data);
    Ok(tag("div")
        .attr("id", "summary")
        .style("position", "fixed")
        .style("background-color", "#fff")
        .style("padding", "20px")
        .child(tag("h2").child("User Data"))
        .child(tag("pre").child(summary))
        .child(button("start-over", "Start Over", move |_| {
            set_visible.set(false);
            state.go_to(Page::Basic);
        }))
        .into())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
