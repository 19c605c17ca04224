use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{import::FILE_FIELD, models::Movie, view::CatalogView};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const DATASTAR_CDN: &str =
    "https://cdn.jsdelivr.net/npm/@sudodevnull/datastar@0.19.9/dist/datastar.js";
const LIVE_SEARCH: &str = "@get('/movies/listing?' + \
     new URLSearchParams(new FormData(document.getElementById('catalog'))))";
const WORKBOOK_ACCEPT: &str = ".xls,.xlsx,.xlsm,.xlsb,.ods";

const BUTTON_GREEN: &str =
    "rounded-md bg-green-600 px-4 py-2 text-sm font-semibold text-white hover:bg-green-700";
const BUTTON_RED: &str =
    "rounded-md bg-red-600 px-4 py-2 text-sm font-semibold text-white hover:bg-red-700";
const BUTTON_BLUE: &str =
    "rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700";
const INPUT: &str = "w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";

/// Form values shown on the add/edit page.
#[derive(Debug, Default)]
pub struct MovieFormValues<'a> {
    pub movie_name: &'a str,
    pub description: &'a str,
    pub casting: &'a str,
}

impl<'a> From<&'a Movie> for MovieFormValues<'a> {
    fn from(movie: &'a Movie) -> Self {
        Self {
            movie_name: &movie.movie_name,
            description: &movie.description,
            casting: &movie.casting,
        }
    }
}

pub fn index_page(view: &CatalogView, imported: Option<usize>) -> String {
    page(
        "Movie Application",
        html! {
            div class="max-w-6xl mx-auto px-6 py-10" {
                div class="flex items-start justify-between gap-6" {
                    h1 class="text-3xl font-bold text-gray-900" { "Movie Application" }
                    a class=(BUTTON_GREEN) href="/movies/new" { "Add Movie" }
                }

                @if let Some(count) = imported {
                    div class="mt-6 rounded-md bg-green-50 border border-green-200 p-4 text-green-800" {
                        "File uploaded and " (count) " movies added to the database."
                    }
                }

                form id="catalog" class="mt-8 flex gap-3" method="get" action="/" {
                    input class=(INPUT) type="search" name="q" value=(view.query()) placeholder="Search Movie Here" data-on-input=(PreEscaped(LIVE_SEARCH));
                    button class=(BUTTON_BLUE) type="submit" { "Search" }
                    button class=(BUTTON_RED) type="submit" formmethod="post" formaction="/movies/delete-selected" { "Delete Selected" }
                }

                form class="mt-4 flex items-center gap-3" method="post" action="/movies/import" enctype="multipart/form-data" {
                    input class="text-sm text-gray-700" type="file" name=(FILE_FIELD) accept=(WORKBOOK_ACCEPT) required;
                    button class=(BUTTON_BLUE) type="submit" { "Upload Excel" }
                }

                (listing(view))
            }
        },
    )
}

/// The part of the listing page swapped in while the search box is typed into.
pub fn listing_fragment(view: &CatalogView) -> String {
    listing(view).into_string()
}

fn listing(view: &CatalogView) -> Markup {
    html! {
        div id="listing" class="mt-8" {
            p class="text-gray-600" { (view.visible().count()) " of " (view.total()) " movies" }

            // Checked rows the search hides still belong to the selection.
            @for movie in view.hidden_selection() {
                input type="hidden" name="selected" value=(movie.id) form="catalog";
            }

            div class="mt-4 bg-white shadow rounded-lg overflow-hidden" {
                table class="min-w-full divide-y divide-gray-200" {
                    thead class="bg-gray-50" {
                        tr {
                            @for heading in ["Select", "Movie", "Description", "Cast", "Edit", "Delete"] {
                                th class="px-4 py-3 text-left text-xs font-semibold uppercase text-gray-600" { (heading) }
                            }
                        }
                    }
                    tbody class="divide-y divide-gray-100" {
                        @for movie in view.visible() {
                            (movie_row(view, movie))
                        }
                    }
                }
                @if view.visible().next().is_none() {
                    p class="p-6 text-gray-600" { "No movies found." }
                }
            }
        }
    }
}

fn movie_row(view: &CatalogView, movie: &Movie) -> Markup {
    html! {
        tr {
            td class="px-4 py-3" {
                input type="checkbox" name="selected" value=(movie.id) form="catalog" checked[view.is_selected(&movie.id)];
            }
            td class="px-4 py-3 font-medium text-gray-900" { (movie.movie_name) }
            td class="px-4 py-3 text-gray-700" { (movie.description) }
            td class="px-4 py-3 text-gray-700" { (movie.casting) }
            td class="px-4 py-3" {
                a class="text-green-700 hover:text-green-900" href=(format!("/movies/{}/edit", movie.id)) { "Edit" }
            }
            td class="px-4 py-3" {
                a class="text-red-700 hover:text-red-900" href=(format!("/movies/{}/delete", movie.id)) { "Delete" }
            }
        }
    }
}

pub fn movie_form_page(heading: &str, action: &str, values: MovieFormValues<'_>) -> String {
    page(
        heading,
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { (heading) }
                    form class="mt-8 space-y-6" method="post" action=(action) {
                        (text_field("movie_name", "Movie Name", values.movie_name))
                        (text_field("description", "Description", values.description))
                        (text_field("casting", "Casting", values.casting))
                        div class="flex items-center gap-4" {
                            button class=(BUTTON_GREEN) type="submit" { "Save Movie" }
                            a class="text-gray-600 hover:text-gray-900" href="/" { "Cancel" }
                        }
                    }
                }
            }
        },
    )
}

fn text_field(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class=(format!("mt-2 {INPUT}")) type="text" name=(name) id=(name) value=(value) required;
        }
    }
}

pub fn confirm_delete_page(movie: &Movie, back: &str) -> String {
    confirm_page(
        "Are you sure you want to delete this movie?",
        &format!("/movies/{}/delete", movie.id),
        back,
        html! {
            p class="mt-4 text-gray-700" { span class="font-semibold" { (movie.movie_name) } }
        },
    )
}

pub fn confirm_bulk_delete_page(movies: &[&Movie], back: &str) -> String {
    confirm_page(
        "Are you sure you want to delete selected movies?",
        "/movies/delete-selected/confirm",
        back,
        html! {
            ul class="mt-4 list-disc pl-6 text-gray-700" {
                @for movie in movies {
                    li { (movie.movie_name) }
                }
            }
            @for movie in movies {
                input type="hidden" name="ids" value=(movie.id) form="confirm";
            }
        },
    )
}

fn confirm_page(question: &str, action: &str, back: &str, details: Markup) -> String {
    page(
        "Confirm delete",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-xl font-bold text-gray-900" { (question) }
                        (details)
                        form id="confirm" class="mt-6 flex items-center gap-4" method="post" action=(action) {
                            button class=(BUTTON_RED) type="submit" { "Delete" }
                            a class="text-gray-600 hover:text-gray-900" href=(back) { "Cancel" }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
                script type="module" src=(DATASTAR_CDN) {}
            }
            body class="bg-gray-50" { (body) }
        }
    }
    .into_string()
}
