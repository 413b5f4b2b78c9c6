use crate::dom::Document;
use crate::utils::non_empty;

/// Trimmed text of the first element matching `selector`, optionally inside `within`
///
/// Absent elements, blank text, and lookup errors all yield `None`.
pub async fn extract_field<D>(
    document: &D,
    selector: &str,
    within: Option<&D::Element>,
) -> Option<String>
where
    D: Document + ?Sized,
{
    let lookup = match within {
        Some(scope) => document.find_within(scope, selector).await,
        None => document.find(selector).await,
    };

    let element = match lookup {
        Ok(Some(element)) => element,
        Ok(None) => {
            ::log::debug!("No element for \"{}\"", selector);
            return None;
        }
        Err(e) => {
            ::log::debug!("Lookup of \"{}\" failed, treating as absent: {}", selector, e);
            return None;
        }
    };

    match document.inner_text(&element).await {
        Ok(text) => non_empty(&text),
        Err(e) => {
            ::log::debug!("Reading text of \"{}\" failed: {}", selector, e);
            None
        }
    }
}

/// Concatenates the text of `item_selector` inside every `container_selector` match
///
/// Each non-empty text is followed by `delimiter`; containers without a
/// matching item (or with blank text) contribute nothing. Document order is kept.
pub async fn extract_repeated_text<D>(
    document: &D,
    container_selector: &str,
    item_selector: &str,
    delimiter: &str,
) -> String
where
    D: Document + ?Sized,
{
    let containers = match document.find_all(container_selector).await {
        Ok(containers) => containers,
        Err(e) => {
            ::log::warn!(
                "Lookup of \"{}\" failed, no repeated content extracted: {}",
                container_selector,
                e
            );
            return String::new();
        }
    };

    let mut text = String::new();
    let mut extracted = 0;
    for container in containers.iter() {
        if let Some(item) = extract_field(document, item_selector, Some(container)).await {
            text.push_str(&item);
            text.push_str(delimiter);
            extracted += 1;
        }
    }

    ::log::debug!(
        "Extracted {} of {} \"{}\" item(s)",
        extracted,
        containers.len(),
        container_selector
    );
    text
}
