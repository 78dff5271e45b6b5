//! Proyección de colecciones
//!
//! Búsqueda, filtros categóricos y paginación sobre la copia local de una
//! colección. Todo es síncrono y puro: esta etapa nunca toca la red ni
//! activa un estado de carga.

/// Campos sobre los que se aplica la búsqueda de texto
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Conjunto de filtros categóricos de una lista
pub trait FilterSet<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Lista sin filtros categóricos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilters;

impl<T> FilterSet<T> for NoFilters {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Coincidencia de subcadena sin distinguir mayúsculas
fn matches_query<T: Searchable>(item: &T, needle: &str) -> bool {
    needle.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Subconjunto de `items` que cumple la búsqueda y todos los filtros, en orden
pub fn project<'a, T, F>(items: &'a [T], query: &str, filters: &F) -> Vec<&'a T>
where
    T: Searchable,
    F: FilterSet<T>,
{
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| matches_query(*item, &needle) && filters.matches(*item))
        .collect()
}

/// Página `page` de tamaño `page_size`; fuera de rango devuelve un slice vacío
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Número de páginas para `total` elementos (al menos una)
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Página visible de una lista
#[derive(Debug, PartialEq)]
pub struct PageView<'a, T> {
    pub rows: Vec<&'a T>,
    pub total_matches: usize,
    pub page: usize,
    pub page_count: usize,
}

/// Estado de la vista de lista: búsqueda, filtros y página actual.
///
/// Cambiar la búsqueda, los filtros o el tamaño de página vuelve a la página 0.
#[derive(Debug, Clone)]
pub struct ListView<F> {
    query: String,
    filters: F,
    page: usize,
    page_size: usize,
}

impl<F: Default> ListView<F> {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            filters: F::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }
}

impl<F> ListView<F> {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
    }

    pub fn set_filters(&mut self, filters: F) {
        self.filters = filters;
        self.page = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Proyectar y paginar `items` con el estado actual
    pub fn view<'a, T>(&self, items: &'a [T]) -> PageView<'a, T>
    where
        T: Searchable,
        F: FilterSet<T>,
    {
        let matches = project(items, &self.query, &self.filters);
        let total_matches = matches.len();
        let page_count = page_count(total_matches, self.page_size);
        let page = self.page.min(page_count - 1);
        let rows = paginate(&matches, page, self.page_size).to_vec();

        PageView {
            rows,
            total_matches,
            page,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        email: String,
        active: bool,
    }

    impl Searchable for Person {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.email.as_str()]
        }
    }

    struct ActiveOnly;

    impl FilterSet<Person> for ActiveOnly {
        fn matches(&self, item: &Person) -> bool {
            item.active
        }
    }

    fn people(n: usize) -> Vec<Person> {
        (1..=n)
            .map(|i| Person {
                name: format!("Person {}", i),
                email: format!("p{}@mail.com", i),
                active: i % 2 == 0,
            })
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut list = people(5);
        list.push(Person {
            name: "Jane Doe".to_string(),
            email: "jd@mail.com".to_string(),
            active: true,
        });

        let found = project(&list, "jane", &NoFilters);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Jane Doe");

        assert_eq!(project(&list, "  MAIL.COM ", &NoFilters).len(), 6);
        assert_eq!(project(&list, "", &NoFilters).len(), 6);
    }

    #[test]
    fn test_project_is_idempotent() {
        let list = people(30);
        for query in ["", "1", "person 2", "zzz"] {
            let once: Vec<Person> = project(&list, query, &ActiveOnly)
                .into_iter()
                .cloned()
                .collect();
            let twice: Vec<Person> = project(&once, query, &ActiveOnly)
                .into_iter()
                .cloned()
                .collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_pages_cover_collection() {
        for total in [0usize, 1, 9, 10, 11, 23, 40] {
            for size in [1usize, 3, 10, 50] {
                let list = people(total);
                let mut joined = Vec::new();
                for page in 0..page_count(total, size) {
                    joined.extend_from_slice(paginate(&list, page, size));
                }
                assert_eq!(joined, list, "total={} size={}", total, size);
            }
        }
    }

    #[test]
    fn test_twenty_three_rows_page_size_ten() {
        let list = people(23);
        let mut view: ListView<NoFilters> = ListView::new(10);

        let first = view.view(&list);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.rows.first().map(|p| p.name.as_str()), Some("Person 1"));
        assert_eq!(first.rows.len(), 10);

        view.set_page(2);
        let last = view.view(&list);
        assert_eq!(last.rows.len(), 3);
        assert_eq!(last.rows[0].name, "Person 21");
        assert_eq!(last.rows[2].name, "Person 23");
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut view: ListView<NoFilters> = ListView::new(10);
        view.set_page(2);
        view.set_query("person");
        assert_eq!(view.page(), 0);

        view.set_page(1);
        view.set_filters(NoFilters);
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let list = people(5);
        let mut view: ListView<NoFilters> = ListView::new(10);
        view.set_page(7);
        let page = view.view(&list);
        assert_eq!(page.page, 0);
        assert_eq!(page.rows.len(), 5);
        assert!(paginate(&list, 7, 10).is_empty());
    }
}
