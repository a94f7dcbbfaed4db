pub const QUESTIONS_PER_PAGE: usize = 10;

/// Window `[(page - 1) * 10, page * 10)` of `items`, empty when the page is out of range.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let Some(start) = usize::try_from(page)
        .ok()
        .and_then(|page| page.checked_sub(1))
        .and_then(|index| index.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = items.len().min(start + QUESTIONS_PER_PAGE);
    &items[start..end]
}
