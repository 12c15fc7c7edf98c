use stp_invoice::{
    InvoiceTotals, LineItem, RowTemplate, format_amount, format_euros, tax_row_visible,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlInputElement};

const CONTAINER_ID: &str = "lignes-container";
const ADD_BUTTON_ID: &str = "add-ligne-btn";
const TEMPLATE_ID: &str = "ligne-template";
const REVERSE_CHARGE_ID: &str = "autoliquidation";
const ROW_SELECTOR: &str = ".ligne-item";
const CALC_INPUT_CLASS: &str = "calc-input";
const QUANTITY_SELECTOR: &str = r#"input[name*="quantite"]"#;
const UNIT_PRICE_SELECTOR: &str = r#"input[name*="prix_unitaire"]"#;
const ROW_TOTAL_SELECTOR: &str = ".total-ligne";
const NET_TOTAL_ID: &str = "total-ht";
const TAX_TOTAL_ID: &str = "total-tva";
const GROSS_TOTAL_ID: &str = "total-ttc";
const TAX_ROW_ID: &str = "row-tva";
const GROSS_LABEL_SELECTOR: &str = r#"td[id="total-ttc"]"#;
const HIDDEN_CLASS: &str = "d-none";

/// Binds the quote/invoice form when the page has one. Returns whether it did.
pub fn mount_invoice_form(document: &Document) -> Result<bool, JsValue> {
    let (Some(container), Some(add_button), Some(template)) = (
        document.get_element_by_id(CONTAINER_ID),
        document.get_element_by_id(ADD_BUTTON_ID),
        document.get_element_by_id(TEMPLATE_ID),
    ) else {
        return Ok(false);
    };

    recalculate(document);

    let on_input = {
        let document = document.clone();
        Closure::wrap(Box::new(move |event: Event| {
            let is_calc_input = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|element| element.class_list().contains(CALC_INPUT_CLASS));
            if is_calc_input {
                recalculate(&document);
            }
        }) as Box<dyn FnMut(Event)>)
    };
    container.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();

    let on_add = {
        let container = container.clone();
        let template = RowTemplate::new(template.inner_html());
        Closure::wrap(Box::new(move |_: Event| {
            let index = container.child_element_count() as usize;
            if let Err(error) =
                container.insert_adjacent_html("beforeend", &template.instantiate(index))
            {
                tracing::warn!("failed to insert line-item row {index}: {error:?}");
            }
        }) as Box<dyn FnMut(Event)>)
    };
    add_button.add_event_listener_with_callback("click", on_add.as_ref().unchecked_ref())?;
    on_add.forget();

    if let Some(checkbox) = document.get_element_by_id(REVERSE_CHARGE_ID) {
        let on_change = {
            let document = document.clone();
            Closure::wrap(Box::new(move |_: Event| recalculate(&document)) as Box<dyn FnMut(Event)>)
        };
        checkbox.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }

    Ok(true)
}

/// Rewrites every row total and the summary block from the current inputs.
fn recalculate(document: &Document) {
    let mut items = Vec::new();
    if let Ok(rows) = document.query_selector_all(ROW_SELECTOR) {
        for index in 0..rows.length() {
            let Some(row) = rows
                .get(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let item = LineItem::from_inputs(
                &input_value(&row, QUANTITY_SELECTOR),
                &input_value(&row, UNIT_PRICE_SELECTOR),
            );
            if let Some(total) = input_in(&row, ROW_TOTAL_SELECTOR) {
                total.set_value(&format_amount(item.line_total()));
            }
            items.push(item);
        }
    }

    let reverse_charge = document
        .get_element_by_id(REVERSE_CHARGE_ID)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .is_some_and(|checkbox| checkbox.checked());
    let totals = InvoiceTotals::compute(&items, reverse_charge);

    set_text(document, NET_TOTAL_ID, &format_euros(totals.net));
    set_text(document, TAX_TOTAL_ID, &format_euros(totals.tax));
    set_text(document, GROSS_TOTAL_ID, &format_euros(totals.gross));

    if let Some(tax_row) = document.get_element_by_id(TAX_ROW_ID) {
        let _ = tax_row
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !tax_row_visible(reverse_charge));
    }

    let gross_label = document
        .query_selector(GROSS_LABEL_SELECTOR)
        .ok()
        .flatten()
        .and_then(|cell| cell.previous_element_sibling())
        .and_then(|cell| cell.query_selector("strong").ok().flatten());
    if let Some(label) = gross_label {
        label.set_text_content(Some(totals.label()));
    }
}

fn input_in(row: &Element, selector: &str) -> Option<HtmlInputElement> {
    row.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
}

fn input_value(row: &Element, selector: &str) -> String {
    input_in(row, selector)
        .map(|input| input.value())
        .unwrap_or_default()
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        element.set_text_content(Some(text));
    }
}
