
#[cfg(test)]
mod auth_tests;


#[cfg(test)]
mod case_search_tests;

#[cfg(test)]
mod case_upcoming_tests;

#[cfg(test)]
mod case_stats_tests;

#[cfg(test)]
mod case_get_tests;



#[cfg(test)]
mod case_delete_tests;
